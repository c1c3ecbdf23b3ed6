//! Reference management for lineage.
//!
//! References are the human-readable entry points into commit history.
//!
//! - **Branches** are mutable pointers under `refs/heads/`.
//! - **Tags** are immutable pointers under `refs/tags/`; delete and
//!   recreate to move one.
//! - **HEAD** names the current branch, or holds a commit id directly when
//!   detached.
//!
//! # Modules
//!
//! - [`error`] - Error types for ref operations
//! - [`types`] - Core ref types: [`Ref`], [`Head`]
//! - [`traits`] - The [`RefStore`] trait defining the storage interface
//! - [`names`] - Branch/tag name validation
//! - [`memory`] - In-memory [`InMemoryRefStore`] for tests
//! - [`file`] - [`FileRefStore`], one file per ref under the repository dir
//! - [`revision`] - [`resolve_revision`] for `HEAD~2`, `main^2`, `abc123` …

pub mod error;
pub mod file;
pub mod memory;
pub mod names;
pub mod revision;
pub mod traits;
pub mod types;

pub use error::{RefError, Result};
pub use file::FileRefStore;
pub use memory::InMemoryRefStore;
pub use names::{validate_branch_name, validate_tag_name};
pub use revision::{resolve_revision, MIN_ABBREV_LEN};
pub use traits::RefStore;
pub use types::{Head, Ref};
