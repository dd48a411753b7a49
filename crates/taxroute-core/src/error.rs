use std::path::PathBuf;

use thiserror::Error;

use crate::region::RegionCode;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: expected `province,region`, got {content:?}")]
    MalformedRow { line: usize, content: String },

    #[error("line {line}: unknown region code {code:?}")]
    UnknownRegion { line: usize, code: String },

    #[error("province {province:?} mapped to both region {first} and region {second}")]
    ConflictingRegion {
        province: String,
        first: RegionCode,
        second: RegionCode,
    },

    #[error("{path}: no region header rows found")]
    EmptyDirectory { path: PathBuf },
}
