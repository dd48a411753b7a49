//! Semantic address matching and resolution orchestration.
//!
//! [`SemanticMatcher`] is the seam to the generative model; [`GeminiClient`]
//! is the production implementation (feature `gemini`). [`Resolver`] ties a
//! matcher to the reference data in `taxroute-core` and produces the
//! [`taxroute_core::ResolvedAgency`] bundle.

pub mod config;
mod error;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod matcher;
pub mod prompt;
pub mod resolver;

pub use config::MatcherConfig;
pub use error::MatchError;
#[cfg(feature = "gemini")]
pub use gemini::GeminiClient;
pub use matcher::{MatchRequest, SemanticMatcher};
pub use resolver::{MIN_ADDRESS_CHARS, Resolver};
