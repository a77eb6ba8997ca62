//! Result and Error types for nucov-utils

/// Type alias for `Result<T, utils::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, PartialEq)]
/// The error type for `nucov_utils`
pub enum Error {
    /// An empty slice of floats for SliceExt
    SliceContainsNoValues,

    /// The slice of float values contains things like NAN or INFINITY
    SliceContainsUndefinedValues,

    /// A catch-all for functions returning errors that should be unreachable
    UncapturedErrorCondition,

    /// Value that is searched for outside of the min/max of the bin edges
    ValueOutsideOfBounds {
        value: f64,
        lower_bound: f64,
        upper_bound: f64,
    },

    /// For when a slice has fewer than the minimum required values
    BelowMinimumSliceLength {
        length: usize,
        minimum_required: usize,
    },
}

impl core::fmt::Display for Error {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Self::SliceContainsNoValues => write!(fmt, "slice is empty"),
            Self::SliceContainsUndefinedValues => write!(fmt, "slice holds NaN or infinite values"),
            Self::UncapturedErrorCondition => write!(fmt, "reached an unexpected condition"),
            Self::ValueOutsideOfBounds {
                value,
                lower_bound,
                upper_bound,
            } => write!(fmt, "{value:e} is outside of {lower_bound:e} to {upper_bound:e}"),
            Self::BelowMinimumSliceLength {
                length,
                minimum_required,
            } => write!(fmt, "slice of length {length} needs at least {minimum_required} values"),
        }
    }
}

impl std::error::Error for Error {}
