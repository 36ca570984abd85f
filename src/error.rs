//! Error type for fallible container operations.

/// Error type for [`TupleVec`](crate::TupleVec) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// No entry with the requested key exists.
    NotFound,
    /// Placing an entry at `index` would break the strictly increasing key order.
    InvalidOrdering {
        /// Position the rejected entry would have occupied.
        index: usize,
    },
    /// Position past the end of the container.
    IndexOutOfBounds {
        /// Requested position.
        index: usize,
        /// Length of the container at the time of the call.
        len: usize,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NotFound => write!(f, "key not found"),
            Error::InvalidOrdering { index } => {
                write!(f, "key at index {} is not strictly increasing", index)
            }
            Error::IndexOutOfBounds { index, len } => {
                write!(f, "index {} out of bounds for length {}", index, len)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Result type for container operations.
pub type Result<T> = std::result::Result<T, Error>;
