//! Error types for the diff crate.

use lineage_types::ObjectId;

/// Errors that can occur while comparing trees.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A tree referenced during the diff was not found in the store.
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] lineage_store::StoreError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
