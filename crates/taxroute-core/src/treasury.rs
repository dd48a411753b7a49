//! Treasury lookup: (district, province) → State Treasury display name.
//!
//! Resolution ladder, first hit wins:
//!
//! 1. province → region via [`RegionTable`]; unknown province → `None`
//! 2. exact normalised district key in that region's directory
//! 3. substring containment either way, in directory order
//! 4. the regional treasury itself ("Kho bạc Nhà nước khu vực XII")
//!
//! Partial matching takes the first containing key with no ranking by
//! specificity, so "Quận 2" can land on the office listed for "Quận 12" when
//! no exact key exists.

use tracing::debug;

use crate::directory::DirectoryIndex;
use crate::normalize::normalize;
use crate::region::{RegionCode, RegionTable};

pub const TREASURY_NAME: &str = "Kho bạc Nhà nước";

/// Display name of a regional treasury: "Kho bạc Nhà nước khu vực XII".
pub fn regional_treasury_name(region: RegionCode) -> String {
    format!("{TREASURY_NAME} khu vực {region}")
}

/// How a treasury was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreasuryMatch {
    Exact {
        region: RegionCode,
        office: String,
    },
    Partial {
        region: RegionCode,
        key: String,
        office: String,
    },
    /// Province known, district not: the regional treasury.
    Regional { region: RegionCode },
}

impl TreasuryMatch {
    pub fn region(&self) -> RegionCode {
        match self {
            Self::Exact { region, .. }
            | Self::Partial { region, .. }
            | Self::Regional { region } => *region,
        }
    }

    pub fn office(&self) -> Option<&str> {
        match self {
            Self::Exact { office, .. } | Self::Partial { office, .. } => Some(office),
            Self::Regional { .. } => None,
        }
    }

    /// "Phòng Giao dịch số 1 - Kho bạc Nhà nước khu vực II", or the bare
    /// regional name when no office matched.
    pub fn display_name(&self) -> String {
        let regional = regional_treasury_name(self.region());
        match self.office() {
            Some(office) => format!("{office} - {regional}"),
            None => regional,
        }
    }
}

/// Treasury lookup over an injected directory and region table.
#[derive(Debug, Clone, Copy)]
pub struct TreasuryLookup<'a> {
    index: &'a DirectoryIndex,
    regions: &'a RegionTable,
}

impl<'a> TreasuryLookup<'a> {
    pub fn new(index: &'a DirectoryIndex, regions: &'a RegionTable) -> Self {
        Self { index, regions }
    }

    /// Lookup over the embedded directory and region table.
    pub fn embedded() -> TreasuryLookup<'static> {
        TreasuryLookup::new(DirectoryIndex::embedded(), RegionTable::embedded())
    }

    /// Walk the resolution ladder. `None` only when the province is unknown.
    pub fn lookup(&self, district: &str, province: &str) -> Option<TreasuryMatch> {
        let Some(region) = self.regions.region_for(province) else {
            debug!(province, "province not in region table");
            return None;
        };

        let Some(offices) = self.index.region(region).filter(|o| !o.is_empty()) else {
            debug!(region = %region, "region has no directory entries");
            return Some(TreasuryMatch::Regional { region });
        };

        let key = normalize(district);
        if key.is_empty() {
            debug!(region = %region, district, "district normalises to nothing");
            return Some(TreasuryMatch::Regional { region });
        }

        if let Some(office) = offices.get(&key) {
            debug!(region = %region, key = %key, office, "exact district match");
            return Some(TreasuryMatch::Exact {
                region,
                office: office.to_string(),
            });
        }

        if let Some((candidate, office)) = offices
            .iter()
            .find(|(candidate, _)| key.contains(candidate) || candidate.contains(key.as_str()))
        {
            debug!(region = %region, key = %key, candidate, office, "partial district match");
            return Some(TreasuryMatch::Partial {
                region,
                key: candidate.to_string(),
                office: office.to_string(),
            });
        }

        debug!(region = %region, key = %key, "no district match; using regional treasury");
        Some(TreasuryMatch::Regional { region })
    }

    /// Treasury display name, or `None` when the province is unknown.
    pub fn resolve_treasury(&self, district: &str, province: &str) -> Option<String> {
        self.lookup(district, province)
            .map(|m| m.display_name())
    }
}

/// [`TreasuryLookup::resolve_treasury`] over the embedded data.
pub fn resolve_treasury(district: &str, province: &str) -> Option<String> {
    TreasuryLookup::embedded().resolve_treasury(district, province)
}
