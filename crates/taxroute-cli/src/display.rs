//! Plain-text rendering for lookup provenance and directory statistics.

use std::fmt::Write;

use taxroute_core::treasury::regional_treasury_name;
use taxroute_core::{DirectoryIndex, RegionCode, RegionTable, TreasuryMatch};

/// One-line description of how a treasury was found.
pub fn match_summary(m: &TreasuryMatch) -> String {
    match m {
        TreasuryMatch::Exact { region, .. } => format!("exact district match in region {region}"),
        TreasuryMatch::Partial { region, key, .. } => {
            format!("partial match on \"{key}\" in region {region}")
        }
        TreasuryMatch::Regional { region } => {
            format!("no district match; regional treasury {region}")
        }
    }
}

/// Per-region table: code, district count, provinces served.
pub fn stats_table(index: &DirectoryIndex, regions: &RegionTable) -> String {
    let stats = index.stats();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} regions, {} districts, {} province names",
        stats.regions,
        stats.districts,
        regions.len()
    );
    for code in RegionCode::all() {
        let districts = index.region(code).map_or(0, |o| o.len());
        let provinces = regions.provinces_in(code);
        if districts == 0 && provinces.is_empty() {
            continue;
        }
        let _ = writeln!(
            out,
            "  {:<6} {:>4}  {}",
            code.roman(),
            districts,
            provinces.join(", ")
        );
    }
    out
}

/// Region code plus the regional treasury name.
pub fn region_line(code: RegionCode) -> String {
    format!("{} ({})", code.roman(), regional_treasury_name(code))
}
