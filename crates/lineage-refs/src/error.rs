//! Error types for reference operations.

use lineage_dag::DagError;
use lineage_store::StoreError;
use thiserror::Error;

/// Errors that can occur during reference operations.
#[derive(Debug, Error)]
pub enum RefError {
    /// The reference was not found.
    #[error("ref not found: {name}")]
    NotFound { name: String },

    /// The branch or tag name is invalid.
    #[error("invalid ref name: {name}: {reason}")]
    InvalidRefName { name: String, reason: String },

    /// A tag is immutable and cannot be updated.
    #[error("tag is immutable: {name}")]
    TagImmutable { name: String },

    /// Cannot delete the currently checked-out branch.
    #[error("cannot delete current branch: {name}")]
    DeleteCurrentBranch { name: String },

    /// A ref file exists but its contents cannot be understood.
    #[error("corrupt ref {name}: {reason}")]
    Corrupt { name: String, reason: String },

    /// Serialization failure or poisoned lock.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The revision expression is malformed.
    #[error("invalid revision: {0}")]
    InvalidRevision(String),

    /// The revision expression is well formed but names nothing.
    #[error("unknown revision: {0}")]
    UnknownRevision(String),

    /// An abbreviated id matches more than one commit.
    #[error("ambiguous revision {prefix}: {matches} commits match")]
    AmbiguousRevision { prefix: String, matches: usize },

    /// Walking parents while resolving a revision failed.
    #[error("traversal error: {0}")]
    Traversal(#[from] DagError),

    /// Object store failure while resolving a revision.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error during file-based ref operations.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for ref operations.
pub type Result<T> = std::result::Result<T, RefError>;
