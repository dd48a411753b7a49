//! Treasury regions (khu vực) and the province → region table.
//!
//! Every province belongs to exactly one of twenty regions, each served by a
//! regional State Treasury (Kho bạc Nhà nước khu vực I..XX). The table is
//! embedded from `data/province_regions.csv`; province names are stored in
//! normalised form so lookups accept any spelling [`normalize`] folds to the
//! same key ("Tỉnh Hà Tĩnh", "ha tinh", "Hà Tĩnh").

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use once_cell::sync::OnceCell;
use tracing::info;

use crate::error::DataError;
use crate::normalize::normalize;

const EMBEDDED_TABLE: &str = include_str!("../data/province_regions.csv");

const ROMAN: [&str; 21] = [
    "", "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII", "XIII", "XIV",
    "XV", "XVI", "XVII", "XVIII", "XIX", "XX",
];

/// A treasury region, 1..=20, displayed as a Roman numeral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionCode(u8);

impl RegionCode {
    pub const COUNT: u8 = 20;

    /// Region from its ordinal. `None` outside 1..=20.
    pub fn from_number(n: u32) -> Option<Self> {
        (1..=u32::from(Self::COUNT))
            .contains(&n)
            .then(|| Self(n as u8))
    }

    /// Region from its Roman numeral ("XII"), case-insensitive.
    pub fn from_roman(s: &str) -> Option<Self> {
        let upper = s.trim().to_ascii_uppercase();
        ROMAN
            .iter()
            .position(|r| !r.is_empty() && *r == upper)
            .map(|i| Self(i as u8))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn roman(self) -> &'static str {
        ROMAN[self.0 as usize]
    }

    /// All twenty regions in order.
    pub fn all() -> impl Iterator<Item = RegionCode> {
        (1..=Self::COUNT).map(Self)
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.roman())
    }
}

/// Normalised province name → region.
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    by_province: HashMap<String, RegionCode>,
}

impl RegionTable {
    /// Parse `province,region` rows. Blank lines and `#` comments are skipped.
    ///
    /// A province listed twice must name the same region both times; aliases
    /// that normalise to the same key are allowed.
    pub fn from_csv(text: &str) -> Result<Self, DataError> {
        let mut by_province = HashMap::new();

        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line_no = i + 1;

            let Some((province, code)) = line.rsplit_once(',') else {
                return Err(DataError::MalformedRow {
                    line: line_no,
                    content: line.to_string(),
                });
            };
            let key = normalize(province);
            if key.is_empty() {
                return Err(DataError::MalformedRow {
                    line: line_no,
                    content: line.to_string(),
                });
            }
            let region = RegionCode::from_roman(code).ok_or_else(|| DataError::UnknownRegion {
                line: line_no,
                code: code.trim().to_string(),
            })?;

            if let Some(&existing) = by_province.get(&key)
                && existing != region
            {
                return Err(DataError::ConflictingRegion {
                    province: key,
                    first: existing,
                    second: region,
                });
            }
            by_province.insert(key, region);
        }

        Ok(Self { by_province })
    }

    /// Load a table from disk, in the same format as the embedded one.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_csv(&text)?;
        info!(path = %path.display(), provinces = table.len(), "loaded region table");
        Ok(table)
    }

    /// The embedded table, parsed on first use and shared for the process lifetime.
    pub fn embedded() -> &'static RegionTable {
        static TABLE: OnceCell<RegionTable> = OnceCell::new();
        TABLE.get_or_init(|| {
            let table =
                Self::from_csv(EMBEDDED_TABLE).expect("embedded province_regions.csv is valid");
            info!(provinces = table.len(), "built embedded region table");
            table
        })
    }

    /// Region for a province name, in any spelling that normalises to a known key.
    pub fn region_for(&self, province: &str) -> Option<RegionCode> {
        self.by_province.get(&normalize(province)).copied()
    }

    /// Normalised province keys assigned to `region`, sorted.
    pub fn provinces_in(&self, region: RegionCode) -> Vec<&str> {
        let mut provinces: Vec<&str> = self
            .by_province
            .iter()
            .filter(|(_, r)| **r == region)
            .map(|(p, _)| p.as_str())
            .collect();
        provinces.sort_unstable();
        provinces
    }

    pub fn len(&self) -> usize {
        self.by_province.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_province.is_empty()
    }
}

/// Region for a province using the embedded table.
pub fn region_for(province: &str) -> Option<RegionCode> {
    RegionTable::embedded().region_for(province)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roman_numerals() {
        assert_eq!(RegionCode::from_number(1).unwrap().roman(), "I");
        assert_eq!(RegionCode::from_number(4).unwrap().roman(), "IV");
        assert_eq!(RegionCode::from_number(19).unwrap().roman(), "XIX");
        assert_eq!(RegionCode::from_number(20).unwrap().to_string(), "XX");
    }

    #[test]
    fn out_of_range_numbers() {
        assert!(RegionCode::from_number(0).is_none());
        assert!(RegionCode::from_number(21).is_none());
    }

    #[test]
    fn from_roman_round_trips() {
        for region in RegionCode::all() {
            assert_eq!(RegionCode::from_roman(region.roman()), Some(region));
        }
        assert_eq!(RegionCode::from_roman("xii").map(|r| r.number()), Some(12));
        assert!(RegionCode::from_roman("").is_none());
        assert!(RegionCode::from_roman("XXI").is_none());
    }

    #[test]
    fn embedded_table_covers_every_region() {
        let table = RegionTable::embedded();
        for region in RegionCode::all() {
            assert!(
                !table.provinces_in(region).is_empty(),
                "region {region} has no provinces"
            );
        }
        assert!(table.len() >= 63);
    }

    #[test]
    fn resolves_common_spellings() {
        assert_eq!(region_for("Hà Nội").map(|r| r.roman()), Some("I"));
        assert_eq!(region_for("Thành phố Hồ Chí Minh").map(|r| r.roman()), Some("II"));
        assert_eq!(region_for("ho chi minh").map(|r| r.roman()), Some("II"));
        assert_eq!(region_for("Tỉnh Quảng Ninh").map(|r| r.roman()), Some("III"));
        assert_eq!(region_for("Thừa Thiên Huế").map(|r| r.roman()), Some("XII"));
        assert_eq!(region_for("Huế").map(|r| r.roman()), Some("XII"));
        assert_eq!(region_for("Bà Rịa - Vũng Tàu").map(|r| r.roman()), Some("XV"));
        assert_eq!(region_for("Bà Rịa Vũng Tàu").map(|r| r.roman()), Some("XV"));
        assert_eq!(region_for("Đắk Lắk").map(|r| r.roman()), Some("XIV"));
    }

    #[test]
    fn province_containing_unit_word_resolves() {
        // "tinh" is an administrative word, so "Hà Tĩnh" folds to "ha" on both sides.
        assert_eq!(region_for("Hà Tĩnh").map(|r| r.roman()), Some("XI"));
        assert_eq!(region_for("Tỉnh Hà Tĩnh").map(|r| r.roman()), Some("XI"));
    }

    #[test]
    fn unknown_province() {
        assert!(region_for("Atlantis").is_none());
        assert!(region_for("").is_none());
    }

    #[test]
    fn rejects_conflicting_rows() {
        let err = RegionTable::from_csv("Hà Nội,I\nha noi,II\n").unwrap_err();
        assert!(matches!(err, DataError::ConflictingRegion { .. }));
    }

    #[test]
    fn accepts_duplicate_aliases() {
        let table = RegionTable::from_csv("Huế,XII\nThừa Thiên Huế,XII\nhue,XII\n").unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn load_reads_table_from_disk() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("regions.csv");
        std::fs::write(&path, "# province,region\nHà Nội,III\nĐà Nẵng,XII\n").unwrap();
        let table = RegionTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.region_for("Hà Nội").map(|r| r.roman()), Some("III"));
        assert!(table.region_for("Hồ Chí Minh").is_none());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = RegionTable::load(&tmp.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }

    #[test]
    fn load_reports_bad_rows() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("regions.csv");
        std::fs::write(&path, "Hà Nội,I\nHà Nam,XXV\n").unwrap();
        assert!(matches!(
            RegionTable::load(&path).unwrap_err(),
            DataError::UnknownRegion { line: 2, .. }
        ));
    }

    #[test]
    fn rejects_malformed_rows() {
        assert!(matches!(
            RegionTable::from_csv("Hà Nội\n").unwrap_err(),
            DataError::MalformedRow { line: 1, .. }
        ));
        assert!(matches!(
            RegionTable::from_csv("# header\nHà Nội,XXX\n").unwrap_err(),
            DataError::UnknownRegion { line: 2, .. }
        ));
    }
}
