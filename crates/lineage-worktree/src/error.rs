//! Error types for working directory inspection.

use std::path::PathBuf;

/// Errors that can occur while inspecting the working directory.
#[derive(Debug, thiserror::Error)]
pub enum WorktreeError {
    /// The working directory root does not exist or is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Store operation failed while loading the committed tree.
    #[error("store error: {0}")]
    Store(#[from] lineage_store::StoreError),

    /// I/O error on the working directory itself.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for worktree results.
pub type WorktreeResult<T> = Result<T, WorktreeError>;
