//! Read-only view over a single commit in the history graph.

use lineage_store::{Commit, ObjectKind, ObjectStore};
use lineage_types::{CommitId, Signature, TreeId};

use crate::error::{DagError, DagResult};

/// A commit together with the id it is stored under.
///
/// Nodes are cheap to clone relative to a store lookup and are never
/// mutated by traversal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitNode {
    id: CommitId,
    commit: Commit,
}

impl CommitNode {
    /// Wrap an already decoded commit.
    pub fn new(id: CommitId, commit: Commit) -> Self {
        Self { id, commit }
    }

    /// Resolve `id` through the store.
    ///
    /// Fails with [`DagError::CommitNotFound`] if the object is absent and
    /// [`DagError::NotACommit`] if it decodes to something else.
    pub fn load(store: &dyn ObjectStore, id: &CommitId) -> DagResult<Self> {
        let stored = store.read(id)?.ok_or(DagError::CommitNotFound(*id))?;
        if stored.kind != ObjectKind::Commit {
            return Err(DagError::NotACommit {
                id: *id,
                kind: stored.kind,
            });
        }
        let commit = Commit::from_stored_object(&stored)?;
        Ok(Self { id: *id, commit })
    }

    pub fn id(&self) -> CommitId {
        self.id
    }

    /// Parent ids in recorded order; the first parent is the mainline.
    pub fn parent_ids(&self) -> &[CommitId] {
        &self.commit.parents
    }

    pub fn tree(&self) -> TreeId {
        self.commit.tree
    }

    pub fn message(&self) -> &str {
        &self.commit.message
    }

    /// First line of the message.
    pub fn summary(&self) -> &str {
        self.commit.message.lines().next().unwrap_or_default()
    }

    pub fn author(&self) -> &Signature {
        &self.commit.author
    }

    pub fn committer(&self) -> &Signature {
        &self.commit.committer
    }

    pub fn is_root(&self) -> bool {
        self.commit.parents.is_empty()
    }

    pub fn is_merge(&self) -> bool {
        self.commit.parents.len() > 1
    }

    pub fn commit(&self) -> &Commit {
        &self.commit
    }
}
