//! Result and Error types for nucov-errorr

/// Type alias for Result<T, errorr::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `nucov-errorr` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("failed to decode record: {0}")]
    Decode(#[from] nucov_records::Error),

    #[error("failed slice operation: {0}")]
    Utils(#[from] nucov_utils::Error),

    #[error("{groups} groups need {expected} boundaries, but the header declares {found}")]
    InvalidBoundaryCount {
        groups: usize,
        expected: usize,
        found: usize,
    },

    #[error("group boundaries must strictly increase (boundary {index} is {value:e} eV)")]
    NonIncreasingBoundaries { index: usize, value: f64 },

    #[error("{what} has {found} groups, expected {expected}")]
    GroupCountMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("covariance row {row} with {count} values from column {col_start} does not fit a {groups} group matrix")]
    RecordOutOfBounds {
        row: usize,
        col_start: usize,
        count: usize,
        groups: usize,
    },

    #[error(
        "non-positive diagonal in the {size}x{size} covariance matrix at (group, value) {entries:?}, \
        the group structure used in processing is likely inconsistent with the covariance data"
    )]
    NonPositiveDiagonal {
        size: usize,
        entries: Vec<(usize, f64)>,
    },

    #[error("energy limits {lower:?} to {upper:?} eV do not select any groups")]
    InvalidEnergyLimits {
        lower: Option<f64>,
        upper: Option<f64>,
    },

    #[error("file {0} not found in the archive")]
    MissingFile(u32),

    #[error("section MF{mf}/MT{mt} not found in the archive")]
    MissingSection { mf: u32, mt: u32 },

    #[error("file {0} does not hold mean values")]
    UnsupportedFile(u32),
}
