//! Tree comparison for lineage.
//!
//! [`diff_trees`] walks two trees side by side and reports file-level
//! changes as a [`ChangeSet`]. Sub-trees with identical ids are not
//! descended into. Renames are detected only for exact content matches.

pub mod error;
pub mod tree_diff;

pub use error::{DiffError, DiffResult};
pub use tree_diff::{diff_trees, ChangeSet, TreeChange};
