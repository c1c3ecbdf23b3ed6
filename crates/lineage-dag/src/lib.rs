//! Commit history traversal for lineage.
//!
//! Everything in this crate reads the commit DAG lazily through an
//! [`ObjectStore`](lineage_store::ObjectStore); nothing is preloaded and the
//! store is never written. Edges point from child to parent.
//!
//! - [`CommitNode`] - read-only view over one commit
//! - [`FilterCommitIter`] - breadth-first walk with stop / skip filters and
//!   an externally seeded [`VisitedSet`]
//! - [`is_ancestor`] - reachability between two commits
//! - [`merge_base`] - best common ancestors (several under criss-cross merges)
//! - [`independents`] - reduce a commit set to mutually unreachable heads
//!
//! Each operation owns its traversal state; run separate calls for separate
//! commit pairs rather than sharing a [`VisitedSet`].

pub mod ancestry;
pub mod error;
pub mod filter;
pub mod independents;
pub mod iter;
pub mod merge_base;
pub mod node;
pub mod visited;

#[cfg(test)]
mod properties;
#[cfg(test)]
pub(crate) mod testutil;

pub use ancestry::is_ancestor;
pub use error::{DagError, DagResult};
pub use filter::{CommitFilter, FnFilter, IdFilter, Never};
pub use independents::independents;
pub use iter::{bfs_iter, FilterCommitIter};
pub use merge_base::{merge_base, AncestorSet};
pub use node::CommitNode;
pub use visited::VisitedSet;
