//! Content-addressed object storage.
//!
//! Blobs, trees and commits are immutable once written and are keyed by a
//! domain-separated hash of their kind and payload, so the same content
//! always lands under the same id.
//!
//! Two backends implement [`ObjectStore`]:
//!
//! - [`InMemoryObjectStore`], an ordered map for tests and short-lived histories
//! - [`DiskObjectStore`], one file per object with hash verification on read
//!
//! Stores propagate every I/O failure to the caller and never retry.

pub mod disk;
pub mod error;
pub mod hasher;
pub mod memory;
pub mod object;
pub mod traits;

pub use disk::DiskObjectStore;
pub use error::{StoreError, StoreResult};
pub use hasher::ContentHasher;
pub use memory::InMemoryObjectStore;
pub use object::{Blob, Commit, EntryMode, ObjectKind, StoredObject, Tree, TreeEntry};
pub use traits::ObjectStore;
