//! Result and Error types for nucov-records

/// Type alias for Result<T, records::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `nucov-records` crate
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("line has {length} columns but the layout needs {required}: \"{line}\"")]
    LineTooShort {
        line: String,
        length: usize,
        required: usize,
    },

    #[error("field {field} is not numeric ({content:?}) in \"{line}\"")]
    InvalidField {
        line: String,
        field: usize,
        content: String,
    },

    #[error("{name} must be a non-negative integer (found {value})")]
    OutOfRange { name: &'static str, value: i64 },

    #[error("block ended after {found} of {expected} expected values")]
    UnexpectedEndOfBlock { expected: usize, found: usize },

    #[error("no lines remain in the block")]
    EndOfBlock,

    #[error("line {index}: {source}")]
    AtLine {
        index: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the position of the offending line within its block
    pub(crate) fn at_line(self, index: usize) -> Self {
        match self {
            // keep the innermost position
            Self::AtLine { .. } => self,
            _ => Self::AtLine {
                index,
                source: Box::new(self),
            },
        }
    }
}
