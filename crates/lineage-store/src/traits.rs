use lineage_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::{Commit, StoredObject, Tree};

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written. Content-addressing guarantees this:
///   the same data always produces the same ID.
/// - Concurrent reads are always safe (objects are immutable).
/// - The store never interprets object contents; it is a pure key-value store.
/// - All I/O errors are propagated, never silently ignored. Retrying transient
///   failures is the backend's business, never the caller's.
pub trait ObjectStore: Send + Sync {
    /// Read an object by its content-addressed ID.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    /// Returns `Err` on I/O failure or data corruption.
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>>;

    /// Write an object and return its content-addressed ID.
    ///
    /// If the object already exists, this is a no-op (idempotent).
    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Delete an object by ID. Returns `true` if the object existed.
    ///
    /// This is intended for garbage collection only. Deletion of
    /// referenced objects can corrupt the store.
    fn delete(&self, id: &ObjectId) -> StoreResult<bool>;

    /// All stored IDs whose hex form starts with `hex_prefix`, sorted.
    fn find_by_prefix(&self, hex_prefix: &str) -> StoreResult<Vec<ObjectId>>;

    /// Read and decode a tree, failing with `NotFound` if it is absent.
    fn read_tree(&self, id: &ObjectId) -> StoreResult<Tree> {
        let stored = self.read(id)?.ok_or(StoreError::NotFound(*id))?;
        Tree::from_stored_object(&stored)
    }

    /// Encode and write a tree.
    fn write_tree(&self, tree: &Tree) -> StoreResult<ObjectId> {
        self.write(&tree.to_stored_object()?)
    }

    /// Encode and write a commit.
    fn write_commit(&self, commit: &Commit) -> StoreResult<ObjectId> {
        self.write(&commit.to_stored_object()?)
    }
}
