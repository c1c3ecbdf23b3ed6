//! Predicates that steer a [`FilterCommitIter`](crate::FilterCommitIter).
//!
//! A walk takes two filters. The *stop* filter cuts a commit off entirely:
//! it is neither emitted nor expanded. The *skip* filter only hides a
//! commit from the consumer; its parents are still explored.

use std::collections::HashSet;

use lineage_types::CommitId;

use crate::node::CommitNode;

/// Decides whether a commit matches during a walk.
pub trait CommitFilter {
    fn matches(&self, commit: &CommitNode) -> bool;
}

impl<T: CommitFilter + ?Sized> CommitFilter for &T {
    fn matches(&self, commit: &CommitNode) -> bool {
        (**self).matches(commit)
    }
}

impl<T: CommitFilter + ?Sized> CommitFilter for Box<T> {
    fn matches(&self, commit: &CommitNode) -> bool {
        (**self).matches(commit)
    }
}

/// Matches nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Never;

impl CommitFilter for Never {
    fn matches(&self, _commit: &CommitNode) -> bool {
        false
    }
}

/// Matches commits whose id is in a fixed set.
#[derive(Clone, Debug, Default)]
pub struct IdFilter {
    ids: HashSet<CommitId>,
}

impl IdFilter {
    pub fn new<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = CommitId>,
    {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn single(id: CommitId) -> Self {
        Self::new([id])
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl CommitFilter for IdFilter {
    fn matches(&self, commit: &CommitNode) -> bool {
        self.ids.contains(&commit.id())
    }
}

/// Adapts a closure into a filter.
pub struct FnFilter<F>(pub F);

impl<F> CommitFilter for FnFilter<F>
where
    F: Fn(&CommitNode) -> bool,
{
    fn matches(&self, commit: &CommitNode) -> bool {
        (self.0)(commit)
    }
}

impl<F> std::fmt::Debug for FnFilter<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnFilter(..)")
    }
}
