//! Error types for store operations

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Error type for the hash store boundary
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store operation failed: {0}")]
    Operation(String),

    #[error("batch aborted: {0}")]
    BatchAborted(String),

    #[error("field '{field}' holds a non-numeric value")]
    NotNumeric { field: String },
}

impl StoreError {
    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an operation error
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// Check if this error came from a rejected batch
    #[must_use]
    pub fn is_batch_abort(&self) -> bool {
        matches!(self, Self::BatchAborted(_))
    }
}
