//! Classify how two commits relate before merging.

use lineage_dag::{merge_base, CommitNode};
use lineage_store::ObjectStore;
use tracing::debug;

use crate::error::MergeResult;

/// How `target` relates to `base`. Computed once per merge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MergeDecision {
    /// Both sides are the same commit.
    SameCommit,
    /// `base` is an ancestor of `target`; moving to `target` merges it.
    FastForwardPossible(CommitNode),
    /// `target` is already contained in `base`.
    AlreadyUpToDate,
    /// The two commits share no history.
    NoCommonHistory,
    /// Histories diverged; a real merge against this base is needed.
    RequiresTrueMerge(CommitNode),
}

impl MergeDecision {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SameCommit => "same-commit",
            Self::FastForwardPossible(_) => "fast-forward",
            Self::AlreadyUpToDate => "up-to-date",
            Self::NoCommonHistory => "unrelated",
            Self::RequiresTrueMerge(_) => "true-merge",
        }
    }
}

/// Classify merging `target` into `base`.
///
/// Merge-base candidates are checked in order; the first that equals one of
/// the inputs decides between fast-forward and up-to-date. When several best
/// common ancestors exist and none is an input, the first one is used as the
/// merge base.
pub fn classify(
    store: &dyn ObjectStore,
    base: &CommitNode,
    target: &CommitNode,
) -> MergeResult<MergeDecision> {
    if base.id() == target.id() {
        return Ok(MergeDecision::SameCommit);
    }

    let ancestors = merge_base(store, base, target)?;
    let decision = if ancestors.is_empty() {
        MergeDecision::NoCommonHistory
    } else if let Some(ancestor) = ancestors
        .iter()
        .find(|a| a.id() == base.id() || a.id() == target.id())
    {
        if ancestor.id() == base.id() {
            MergeDecision::FastForwardPossible(target.clone())
        } else {
            MergeDecision::AlreadyUpToDate
        }
    } else {
        let mut ancestors = ancestors;
        MergeDecision::RequiresTrueMerge(ancestors.swap_remove(0))
    };

    debug!(
        base = %base.id().short_hex(),
        target = %target.id().short_hex(),
        decision = decision.label(),
        "classified merge"
    );
    Ok(decision)
}
