//! Error types for metadata operations

use metabind_store::StoreError;
use thiserror::Error;

/// Common result type for metadata operations
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Error type for the metadata core
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Required-field access on an absent field
    #[error("field '{field}' not found under key '{key}'")]
    FieldNotFound { key: String, field: String },

    /// No key template configured for this owner
    #[error("no metadata key configured for this owner")]
    Unconfigured,

    /// Malformed wildcard pattern in a delete call
    #[error("invalid field pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Failure from the underlying store, propagated unmodified
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MetadataError {
    /// Check if this is a recoverable field miss
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FieldNotFound { .. })
    }
}
