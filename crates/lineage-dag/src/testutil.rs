//! Helpers for building commit histories in tests.

use std::cell::Cell;

use lineage_store::{Commit, InMemoryObjectStore, ObjectStore, Tree};
use lineage_types::{CommitId, Signature, TreeId};

use crate::node::CommitNode;

/// An in-memory store plus a clock, so every commit gets a distinct id.
pub(crate) struct TestGraph {
    pub store: InMemoryObjectStore,
    tree: TreeId,
    clock: Cell<i64>,
}

impl TestGraph {
    pub fn new() -> Self {
        let store = InMemoryObjectStore::new();
        let tree = store.write_tree(&Tree::empty()).unwrap();
        Self {
            store,
            tree,
            clock: Cell::new(1_700_000_000),
        }
    }

    pub fn commit(&self, message: &str, parents: &[CommitId]) -> CommitId {
        let ts = self.clock.get();
        self.clock.set(ts + 1);
        let commit = Commit::new(
            self.tree,
            parents.to_vec(),
            Signature::new("Test", "test@example.com", ts),
            message,
        );
        self.store.write_commit(&commit).unwrap()
    }

    pub fn node(&self, id: &CommitId) -> CommitNode {
        CommitNode::load(&self.store, id).unwrap()
    }

    /// Ids of `nodes`, for comparing results.
    pub fn ids(nodes: &[CommitNode]) -> Vec<CommitId> {
        nodes.iter().map(CommitNode::id).collect()
    }
}
