//! On-disk lineage repositories.
//!
//! A repository is a working directory with a `.lineage` metadata
//! directory beside the content:
//!
//! ```text
//! .lineage/
//!   HEAD           current branch or detached commit
//!   config.toml    RepoConfig
//!   objects/       content-addressed objects
//!   refs/heads/    branches
//!   refs/tags/     tags
//! ```
//!
//! [`Repository`] ties the object store, refs, working directory and merge
//! engine together behind revision-expression based methods.

pub mod config;
pub mod error;
pub mod repository;

pub use config::{FastForwardMode, MergeConfig, RepoConfig, UserConfig};
pub use error::{RepoError, RepoResult};
pub use repository::Repository;
