//! Foundation types for lineage.
//!
//! This crate provides the identity types shared by every other lineage
//! crate. It has no knowledge of storage or history traversal.
//!
//! # Key Types
//!
//! - [`ObjectId`] - 20-byte content hash identifying any stored object
//! - [`CommitId`] / [`TreeId`] - aliases documenting what an id refers to
//! - [`Signature`] - author / committer identity attached to commits

pub mod error;
pub mod object;
pub mod signature;

pub use error::TypeError;
pub use object::{CommitId, ObjectId, TreeId, OBJECT_ID_LEN};
pub use signature::Signature;
