//! The merge entry point.

use lineage_dag::CommitNode;
use lineage_diff::diff_trees;
use lineage_store::ObjectStore;
use lineage_worktree::WorktreeStatus;
use tracing::{debug, info};

use crate::decision::{classify, MergeDecision};
use crate::error::{MergeError, MergeResult, Unimplemented};
use crate::options::MergeOptions;

/// Successful end states of a merge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Nothing to do: both sides are the same commit.
    SameCommit,
    /// Nothing to do: `target` is already part of `base`.
    AlreadyUpToDate,
    /// `base` can move forward to this commit.
    FastForward(CommitNode),
}

/// Merge `target` into `base`.
///
/// Checks run in a fixed order: a dirty working directory fails first,
/// then the relationship between the commits is classified and acted on
/// under `options`. Paths that would need a new merge commit fail with
/// [`MergeError::NotImplemented`].
pub fn merge(
    store: &dyn ObjectStore,
    worktree: &dyn WorktreeStatus,
    base: &CommitNode,
    target: &CommitNode,
    options: &MergeOptions,
) -> MergeResult<MergeOutcome> {
    if !worktree.is_clean()? {
        return Err(MergeError::WorktreeNotClean);
    }

    let outcome = match classify(store, base, target)? {
        MergeDecision::SameCommit => MergeOutcome::SameCommit,
        MergeDecision::AlreadyUpToDate => MergeOutcome::AlreadyUpToDate,
        MergeDecision::FastForwardPossible(next) => {
            if options.force_merge_commit {
                return Err(MergeError::NotImplemented(Unimplemented::ForcedMergeCommit));
            }
            MergeOutcome::FastForward(next)
        }
        MergeDecision::NoCommonHistory => {
            if !options.allow_unrelated_histories {
                return Err(MergeError::NoCommonHistory);
            }
            return true_merge(store, base, target, None, options);
        }
        MergeDecision::RequiresTrueMerge(merge_base) => {
            if options.fast_forward_only {
                return Err(MergeError::FastForwardRefused);
            }
            return true_merge(store, base, target, Some(&merge_base), options);
        }
    };

    info!(
        base = %base.id().short_hex(),
        target = %target.id().short_hex(),
        outcome = outcome_label(&outcome),
        "merge finished"
    );
    Ok(outcome)
}

fn outcome_label(outcome: &MergeOutcome) -> &'static str {
    match outcome {
        MergeOutcome::SameCommit => "same-commit",
        MergeOutcome::AlreadyUpToDate => "up-to-date",
        MergeOutcome::FastForward(_) => "fast-forward",
    }
}

/// Diverged histories. The tree changes are computed so that store
/// failures surface, but no merge commit is produced yet.
fn true_merge(
    store: &dyn ObjectStore,
    base: &CommitNode,
    target: &CommitNode,
    merge_base: Option<&CommitNode>,
    options: &MergeOptions,
) -> MergeResult<MergeOutcome> {
    let Some(merge_base) = merge_base else {
        return Err(MergeError::NotImplemented(Unimplemented::UnrelatedHistories));
    };

    let changes = diff_trees(store, Some(&base.tree()), &target.tree())?;
    debug!(
        merge_base = %merge_base.id().short_hex(),
        changed = changes.len(),
        paths = ?changes.paths().collect::<Vec<_>>(),
        "tree changes between merge sides"
    );

    if options.no_commit {
        return Err(MergeError::NotImplemented(Unimplemented::NoCommit));
    }
    if options.message_override().is_some() {
        return Err(MergeError::NotImplemented(Unimplemented::CustomMessage));
    }
    Err(MergeError::NotImplemented(Unimplemented::MergeCommit))
}
