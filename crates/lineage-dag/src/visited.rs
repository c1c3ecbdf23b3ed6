//! Visited-set bookkeeping for a single traversal.

use std::collections::HashSet;

use lineage_types::CommitId;

/// Commits a walk must not enqueue again.
///
/// Ids come from two places: the caller may seed the set before the walk
/// starts, and the walk records every commit it discovers. A commit is
/// enqueued at most once per traversal; a seeded commit is never enqueued
/// as a parent.
#[derive(Clone, Debug, Default)]
pub struct VisitedSet {
    seeded: HashSet<CommitId>,
    discovered: HashSet<CommitId>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set pre-populated with externally seen commits.
    pub fn seeded<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = CommitId>,
    {
        Self {
            seeded: ids.into_iter().collect(),
            discovered: HashSet::new(),
        }
    }

    /// Add an externally seen commit.
    pub fn seed(&mut self, id: CommitId) {
        self.seeded.insert(id);
    }

    /// Record `id` as discovered. Returns `false` if it was already known.
    pub fn mark(&mut self, id: CommitId) -> bool {
        if self.seeded.contains(&id) {
            return false;
        }
        self.discovered.insert(id)
    }

    pub fn contains(&self, id: &CommitId) -> bool {
        self.seeded.contains(id) || self.discovered.contains(id)
    }

    pub fn is_seeded(&self, id: &CommitId) -> bool {
        self.seeded.contains(id)
    }

    /// Number of commits discovered by the walk itself.
    pub fn discovered_len(&self) -> usize {
        self.discovered.len()
    }
}
