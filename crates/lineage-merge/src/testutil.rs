//! Histories with real trees for merge tests.

use std::cell::Cell;

use lineage_dag::CommitNode;
use lineage_store::{Blob, Commit, EntryMode, InMemoryObjectStore, ObjectStore, Tree, TreeEntry};
use lineage_types::{CommitId, Signature, TreeId};

pub(crate) struct History {
    pub store: InMemoryObjectStore,
    clock: Cell<i64>,
}

impl History {
    pub fn new() -> Self {
        Self {
            store: InMemoryObjectStore::new(),
            clock: Cell::new(1_700_000_000),
        }
    }

    /// A tree holding `files` as `(name, content)` pairs.
    pub fn tree(&self, files: &[(&str, &str)]) -> TreeId {
        let entries = files
            .iter()
            .map(|(name, content)| {
                let blob = self
                    .store
                    .write(&Blob::new(content.as_bytes().to_vec()).to_stored_object())
                    .unwrap();
                TreeEntry::new(EntryMode::Regular, *name, blob)
            })
            .collect();
        self.store.write_tree(&Tree::new(entries)).unwrap()
    }

    pub fn commit(&self, message: &str, tree: TreeId, parents: &[CommitId]) -> CommitNode {
        let ts = self.clock.get();
        self.clock.set(ts + 1);
        let commit = Commit::new(
            tree,
            parents.to_vec(),
            Signature::new("Test", "test@example.com", ts),
            message,
        );
        let id = self.store.write_commit(&commit).unwrap();
        CommitNode::new(id, commit)
    }
}
