//! Address-to-fiscal-authority resolution engine.
//!
//! Pure, synchronous building blocks: text normalisation, the treasury
//! directory and region table, treasury lookup, agency reference excerpts,
//! and Vietnamese wording for amounts. Reference data is embedded from
//! `data/` and parsed once per process.

pub mod agency;
pub mod directory;
mod error;
pub mod normalize;
pub mod numerals;
pub mod reference;
pub mod region;
pub mod treasury;

pub use agency::{AgencyExtraction, NOT_FOUND, ResolvedAgency};
pub use directory::{DirectoryIndex, DirectoryStats};
pub use error::DataError;
pub use normalize::normalize;
pub use numerals::{format_currency, to_words};
pub use reference::{AgencyReference, select_reference_excerpt};
pub use region::{RegionCode, RegionTable, region_for};
pub use treasury::{TREASURY_NAME, TreasuryLookup, TreasuryMatch, resolve_treasury};
