/// The error type returned by this crate's fallible entry points.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed linkage tree: {reason}")]
    MalformedTree { reason: String },

    #[error("distance matrix does not match {n} leaves: {reason}")]
    DistanceShapeMismatch { n: usize, reason: String },

    #[error("invalid distance value {value} at ({i}, {j})")]
    InvalidDistance { i: usize, j: usize, value: f64 },

    #[error("empty input: a linkage tree needs at least 2 leaves, got {n}")]
    EmptyInput { n: usize },

    #[error("failed to allocate {bytes} bytes for the cost table")]
    OutOfMemory { bytes: usize },

    #[error("optimal_leaf_ordering was cancelled")]
    Cancelled,
}

/// A specialized [`Result`](std::result::Result) using this crate's [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
