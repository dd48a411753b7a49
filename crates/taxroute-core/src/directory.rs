//! Treasury transaction-office directory.
//!
//! The source is a spreadsheet export: one row per district, grouped under
//! region header rows ("KHU VỰC 12 - HUẾ, ĐÀ NẴNG, ..."), with the
//! transaction office (Phòng Giao dịch) written only on the first district it
//! serves. Blank office cells inherit the office above them, as a merged cell
//! would, until the next region header resets it.
//!
//! ```text
//! "KHU VỰC 1 - HÀ NỘI","","",""
//! "1","Phòng Giao dịch số 1","Quận Hoàn Kiếm","32 Cát Linh"
//! "","","Quận Ba Đình",""          <- also Phòng Giao dịch số 1
//! ```
//!
//! [`DirectoryIndex::build`] folds the rows into region → (normalised
//! district → office name).

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use tracing::{info, warn};
use unicode_normalization::UnicodeNormalization;

use crate::error::DataError;
use crate::normalize::normalize;
use crate::region::RegionCode;

const EMBEDDED_DIRECTORY: &str = include_str!("../data/treasury_directory.csv");

const SEPARATOR: char = ',';
const QUOTE: char = '"';

/// Region header marker followed by the region ordinal.
static REGION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^khu\s+vực(?:\s+(\d+))?").unwrap());

/// One classified row of the directory source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryRow {
    /// Region header; `None` when the ordinal is missing or outside 1..=20.
    RegionHeader(Option<RegionCode>),
    /// District row. Either cell may be empty.
    Entry { office: String, district: String },
}

impl DirectoryRow {
    /// Classify one source line. Blank lines and non-header rows with fewer
    /// than three cells yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let cells = split_cells(line);

        let first: String = cells[0].nfc().collect();
        if let Some(caps) = REGION_HEADER.captures(&first) {
            let region = caps
                .get(1)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .and_then(RegionCode::from_number);
            return Some(Self::RegionHeader(region));
        }

        if cells.len() < 3 {
            return None;
        }
        let mut cells = cells.into_iter().skip(1);
        let office = cells.next().unwrap_or_default();
        let district = cells.next().unwrap_or_default();
        Some(Self::Entry { office, district })
    }
}

/// Split a line on unquoted separators. Quote characters toggle quoting and
/// are dropped; every cell is trimmed. Always returns at least one cell.
pub fn split_cells(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            QUOTE => in_quotes = !in_quotes,
            SEPARATOR if !in_quotes => cells.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    cells.push(current);

    cells.into_iter().map(|c| c.trim().to_string()).collect()
}

/// Districts of one region in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct RegionOffices {
    order: Vec<String>,
    offices: HashMap<String, String>,
}

impl RegionOffices {
    /// Later rows for the same key overwrite the office but keep the key's
    /// original position.
    fn insert(&mut self, key: String, office: String) {
        if !self.offices.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.offices.insert(key, office);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.offices.get(key).map(String::as_str)
    }

    /// `(district key, office)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .map(|k| (k.as_str(), self.offices[k].as_str()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Parsed directory: region → district key → transaction office.
#[derive(Debug, Clone, Default)]
pub struct DirectoryIndex {
    regions: BTreeMap<RegionCode, RegionOffices>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryStats {
    pub regions: usize,
    pub districts: usize,
}

/// Fold state carried across rows.
#[derive(Default)]
struct DirectoryFold {
    index: DirectoryIndex,
    region: Option<RegionCode>,
    office: String,
}

impl DirectoryFold {
    fn apply(mut self, row: DirectoryRow) -> Self {
        match row {
            DirectoryRow::RegionHeader(region) => {
                if let Some(code) = region {
                    self.index.regions.entry(code).or_default();
                } else {
                    warn!("region header without a valid 1..=20 ordinal; dropping rows until the next header");
                }
                self.region = region;
                self.office.clear();
            }
            DirectoryRow::Entry { office, district } => {
                if !office.is_empty() {
                    self.office = office;
                }
                if let Some(code) = self.region
                    && !district.is_empty()
                    && !self.office.is_empty()
                {
                    let key = normalize(&district);
                    if !key.is_empty() {
                        self.index
                            .regions
                            .entry(code)
                            .or_default()
                            .insert(key, self.office.clone());
                    }
                }
            }
        }
        self
    }
}

impl DirectoryIndex {
    /// Build the index from the full directory text.
    pub fn build(raw: &str) -> Self {
        Self::from_rows(raw.lines().filter_map(DirectoryRow::parse))
    }

    /// Fold already-classified rows into an index.
    pub fn from_rows(rows: impl IntoIterator<Item = DirectoryRow>) -> Self {
        rows.into_iter()
            .fold(DirectoryFold::default(), DirectoryFold::apply)
            .index
    }

    /// Load a directory export from disk.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let index = Self::build(&raw);
        if index.regions.is_empty() {
            return Err(DataError::EmptyDirectory {
                path: path.to_path_buf(),
            });
        }
        let stats = index.stats();
        info!(
            path = %path.display(),
            regions = stats.regions,
            districts = stats.districts,
            "loaded treasury directory"
        );
        Ok(index)
    }

    /// The embedded directory, built once on first use.
    pub fn embedded() -> &'static DirectoryIndex {
        static INDEX: OnceCell<DirectoryIndex> = OnceCell::new();
        INDEX.get_or_init(|| {
            let index = Self::build(EMBEDDED_DIRECTORY);
            let stats = index.stats();
            info!(
                regions = stats.regions,
                districts = stats.districts,
                "built embedded treasury directory"
            );
            index
        })
    }

    pub fn region(&self, code: RegionCode) -> Option<&RegionOffices> {
        self.regions.get(&code)
    }

    pub fn regions(&self) -> impl Iterator<Item = (RegionCode, &RegionOffices)> {
        self.regions.iter().map(|(code, offices)| (*code, offices))
    }

    pub fn stats(&self) -> DirectoryStats {
        DirectoryStats {
            regions: self.regions.len(),
            districts: self.regions.values().map(RegionOffices::len).sum(),
        }
    }
}
