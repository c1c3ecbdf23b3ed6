//! Error types for merge operations.

use lineage_dag::DagError;
use lineage_diff::DiffError;
use lineage_worktree::WorktreeError;
use thiserror::Error;

/// Merge paths that are recognised but not carried out yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unimplemented {
    /// Creating a merge commit for diverged histories.
    MergeCommit,
    /// A merge commit was requested where a fast-forward would do.
    ForcedMergeCommit,
    /// Merging without committing the result.
    NoCommit,
    /// Merging with a caller-supplied commit message.
    CustomMessage,
    /// Merging histories with no common ancestor.
    UnrelatedHistories,
}

impl std::fmt::Display for Unimplemented {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::MergeCommit => "merge commit",
            Self::ForcedMergeCommit => "no fast-forward merge",
            Self::NoCommit => "no commit merge",
            Self::CustomMessage => "custom message",
            Self::UnrelatedHistories => "unrelated merge",
        })
    }
}

/// Errors that end a merge.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The working directory has uncommitted changes.
    #[error("worktree contains unstaged changes")]
    WorktreeNotClean,

    /// The commits share no history and unrelated merges were not allowed.
    #[error("no shared history")]
    NoCommonHistory,

    /// Histories diverged and only fast-forwards were allowed.
    #[error("non-fast-forward update")]
    FastForwardRefused,

    /// The requested merge path exists but is not implemented.
    #[error("{0} is not implemented")]
    NotImplemented(Unimplemented),

    /// Walking history failed.
    #[error("traversal error: {0}")]
    Traversal(#[from] DagError),

    /// The working directory status could not be determined.
    #[error("worktree error: {0}")]
    Worktree(#[from] WorktreeError),

    /// Comparing trees failed.
    #[error("diff error: {0}")]
    Diff(#[from] DiffError),
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
