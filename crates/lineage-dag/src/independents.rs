//! Reduce a commit list to heads none of which reaches another.

use std::collections::HashSet;
use std::ops::ControlFlow;

use lineage_store::ObjectStore;
use lineage_types::CommitId;
use tracing::debug;

use crate::error::DagResult;
use crate::filter::{IdFilter, Never};
use crate::iter::FilterCommitIter;
use crate::node::CommitNode;
use crate::visited::VisitedSet;

/// Remove every commit that is an ancestor of another commit in the list.
///
/// Duplicates collapse to their first occurrence. Survivors keep their
/// input order, and the surviving set does not depend on that order.
pub fn independents(
    store: &dyn ObjectStore,
    commits: &[CommitNode],
) -> DagResult<Vec<CommitNode>> {
    let mut unique: Vec<CommitNode> = Vec::with_capacity(commits.len());
    let mut ids: HashSet<CommitId> = HashSet::with_capacity(commits.len());
    for commit in commits {
        if ids.insert(commit.id()) {
            unique.push(commit.clone());
        }
    }
    if unique.len() < 2 {
        return Ok(unique);
    }

    let mut dominated: HashSet<CommitId> = HashSet::new();
    for from in &unique {
        if dominated.len() + 1 >= unique.len() {
            break;
        }
        if dominated.contains(&from.id()) {
            continue;
        }

        let targets: HashSet<CommitId> = ids
            .iter()
            .filter(|id| **id != from.id() && !dominated.contains(*id))
            .copied()
            .collect();
        let mut remaining = targets.len();

        let walk = FilterCommitIter::new(
            store,
            from.clone(),
            VisitedSet::new(),
            Never,
            IdFilter::single(from.id()),
        );
        walk.for_each_commit(|commit| {
            if targets.contains(&commit.id()) && dominated.insert(commit.id()) {
                remaining -= 1;
            }
            if remaining == 0 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })?;
    }

    debug!(
        input = unique.len(),
        removed = dominated.len(),
        "reduced commits to independents"
    );
    unique.retain(|commit| !dominated.contains(&commit.id()));
    Ok(unique)
}
