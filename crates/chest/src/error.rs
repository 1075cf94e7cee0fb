//! Error types for the downlink channel estimator

use thiserror::Error;

/// Channel estimator error types
#[derive(Error, Debug)]
pub enum ChestError {
    #[error("invalid cell descriptor: {reason}")]
    InvalidCell { reason: String },

    #[error("filter too long: got {len} taps, max is {max}")]
    FilterTooLong { len: usize, max: usize },
}

/// Result type for channel estimator operations
pub type Result<T> = std::result::Result<T, ChestError>;
