use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("not a lineage repository: {0}")]
    NotARepository(PathBuf),

    #[error("repository already initialized at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("invalid config {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("store error: {0}")]
    Store(#[from] lineage_store::StoreError),

    #[error("ref error: {0}")]
    Ref(#[from] lineage_refs::RefError),

    #[error("traversal error: {0}")]
    Traversal(#[from] lineage_dag::DagError),

    #[error("worktree error: {0}")]
    Worktree(#[from] lineage_worktree::WorktreeError),

    #[error(transparent)]
    Merge(#[from] lineage_merge::MergeError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;
