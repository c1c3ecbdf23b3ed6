//! Error types for history traversal.

use lineage_store::{ObjectKind, StoreError};
use lineage_types::ObjectId;

/// Errors raised while walking the commit graph.
///
/// Every traversal failure is propagated to the caller untouched; nothing in
/// this crate retries a store lookup.
#[derive(Debug, thiserror::Error)]
pub enum DagError {
    /// A commit (or a parent reference) could not be resolved.
    #[error("commit not found: {0}")]
    CommitNotFound(ObjectId),

    /// The id resolved to an object that is not a commit.
    #[error("object {id} is a {kind}, not a commit")]
    NotACommit { id: ObjectId, kind: ObjectKind },

    /// The object store failed while reading history.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias for traversal results.
pub type DagResult<T> = Result<T, DagError>;
