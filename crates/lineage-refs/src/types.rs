//! Core reference types.

use lineage_types::CommitId;
use serde::{Deserialize, Serialize};

/// A named pointer to a commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ref {
    /// Mutable pointer that moves as history grows.
    Branch {
        /// Branch name (e.g. "main", "feature/auth").
        name: String,
        target: CommitId,
    },
    /// Immutable pointer to a specific commit.
    Tag {
        /// Tag name (e.g. "v1.0.0").
        name: String,
        target: CommitId,
    },
}

impl Ref {
    pub fn branch(name: impl Into<String>, target: CommitId) -> Self {
        Ref::Branch {
            name: name.into(),
            target,
        }
    }

    pub fn tag(name: impl Into<String>, target: CommitId) -> Self {
        Ref::Tag {
            name: name.into(),
            target,
        }
    }

    /// Returns the canonical name for this ref (e.g. "refs/heads/main").
    pub fn canonical_name(&self) -> String {
        match self {
            Ref::Branch { name, .. } => format!("refs/heads/{name}"),
            Ref::Tag { name, .. } => format!("refs/tags/{name}"),
        }
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, Ref::Tag { .. })
    }

    /// The commit this ref points to.
    pub fn target(&self) -> CommitId {
        match self {
            Ref::Branch { target, .. } | Ref::Tag { target, .. } => *target,
        }
    }
}

/// The state of HEAD: either symbolic (pointing to a branch) or detached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Head {
    /// HEAD points to a branch by name.
    Symbolic(String),
    /// HEAD is detached, pointing directly to a commit.
    Detached(CommitId),
}
