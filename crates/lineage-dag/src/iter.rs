//! Breadth-first commit walks with stop and skip filters.
//!
//! The walk starts at one commit and follows parent edges in FIFO order.
//! An emitted commit's parents are resolved on the following step, so a
//! consumer that stops at a commit never pays for, or fails on, the
//! history behind it. A dangling parent reference surfaces as an error
//! when it is reached.

use std::collections::{HashSet, VecDeque};
use std::ops::ControlFlow;

use lineage_store::ObjectStore;
use lineage_types::CommitId;
use tracing::trace;

use crate::error::DagResult;
use crate::filter::{CommitFilter, Never};
use crate::node::CommitNode;
use crate::visited::VisitedSet;

/// Lazy breadth-first walk over the ancestors of a commit.
///
/// On each step the head of the queue is popped and:
///
/// 1. if the *stop* filter matches, it is discarded and its parents are not
///    explored;
/// 2. if the *skip* filter matches, its parents are enqueued and the walk
///    moves on;
/// 3. otherwise it is emitted, and its not-yet-visited parents are marked
///    and enqueued in recorded order when the walk is next advanced.
///
/// The start commit is marked visited at construction; a start that is
/// already in the visited set yields nothing. Every reachable commit is
/// enqueued at most once, so each is emitted at most once. After an error
/// the iterator is exhausted.
pub struct FilterCommitIter<'a> {
    store: &'a dyn ObjectStore,
    stop: Box<dyn CommitFilter + 'a>,
    skip: Box<dyn CommitFilter + 'a>,
    visited: VisitedSet,
    queue: VecDeque<CommitNode>,
    /// Parents of the last emitted commit, not yet enqueued.
    pending: Vec<CommitId>,
    failed: bool,
}

impl<'a> FilterCommitIter<'a> {
    /// Start a walk at `start`.
    ///
    /// Ids already in `visited`, the start included, are never enqueued;
    /// pass a seeded set to exclude known history up front. Filters may be
    /// owned values or references.
    pub fn new<S, K>(
        store: &'a dyn ObjectStore,
        start: CommitNode,
        mut visited: VisitedSet,
        stop: S,
        skip: K,
    ) -> Self
    where
        S: CommitFilter + 'a,
        K: CommitFilter + 'a,
    {
        let mut queue = VecDeque::new();
        if visited.mark(start.id()) {
            queue.push_back(start);
        } else {
            trace!(commit = %start.id().short_hex(), "start commit already visited");
        }
        Self {
            store,
            stop: Box::new(stop),
            skip: Box::new(skip),
            visited,
            queue,
            pending: Vec::new(),
            failed: false,
        }
    }

    /// Unfiltered walk over `start` and all of its ancestors.
    pub fn unfiltered(store: &'a dyn ObjectStore, start: CommitNode) -> Self {
        Self::new(store, start, VisitedSet::new(), Never, Never)
    }

    /// Advance to the next emitted commit.
    pub fn next_commit(&mut self) -> DagResult<Option<CommitNode>> {
        let pending = std::mem::take(&mut self.pending);
        self.enqueue(&pending)?;

        while let Some(commit) = self.queue.pop_front() {
            if self.stop.matches(&commit) {
                trace!(commit = %commit.id().short_hex(), "walk stopped at commit");
                continue;
            }
            if self.skip.matches(&commit) {
                self.enqueue(commit.parent_ids())?;
                continue;
            }
            self.pending = commit.parent_ids().to_vec();
            return Ok(Some(commit));
        }
        Ok(None)
    }

    /// Feed every emitted commit to `f` until it breaks or history runs out.
    ///
    /// Breaking is not an error; the walk simply ends.
    pub fn for_each_commit<F>(mut self, mut f: F) -> DagResult<()>
    where
        F: FnMut(&CommitNode) -> ControlFlow<()>,
    {
        while let Some(commit) = self.next_commit()? {
            if f(&commit).is_break() {
                break;
            }
        }
        Ok(())
    }

    fn enqueue(&mut self, parents: &[CommitId]) -> DagResult<()> {
        for parent in parents {
            if !self.visited.mark(*parent) {
                continue;
            }
            let node = CommitNode::load(self.store, parent)?;
            self.queue.push_back(node);
        }
        Ok(())
    }
}

impl Iterator for FilterCommitIter<'_> {
    type Item = DagResult<CommitNode>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_commit() {
            Ok(next) => next.map(Ok),
            Err(err) => {
                self.failed = true;
                self.queue.clear();
                self.pending.clear();
                Some(Err(err))
            }
        }
    }
}

impl std::fmt::Debug for FilterCommitIter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterCommitIter")
            .field("queued", &self.queue.len())
            .field("pending", &self.pending.len())
            .field("discovered", &self.visited.discovered_len())
            .field("failed", &self.failed)
            .finish()
    }
}

/// Plain breadth-first walk from `start`.
///
/// Commits in `seen_external` or `ignore` are treated as already seen: they
/// are never emitted and their history is not explored through them.
pub fn bfs_iter<'a>(
    store: &'a dyn ObjectStore,
    start: CommitNode,
    seen_external: &HashSet<CommitId>,
    ignore: &[CommitId],
) -> FilterCommitIter<'a> {
    let visited = VisitedSet::seeded(seen_external.iter().chain(ignore).copied());
    FilterCommitIter::new(store, start, visited, Never, Never)
}
