use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use lineage_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// Object store held entirely in memory.
///
/// Used by tests and by callers that build short-lived histories. Objects
/// are kept in id order, so prefix lookups scan a contiguous range.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<BTreeMap<ObjectId, StoredObject>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects().is_empty()
    }

    fn objects(&self) -> RwLockReadGuard<'_, BTreeMap<ObjectId, StoredObject>> {
        self.objects.read().expect("lock poisoned")
    }

    fn objects_mut(&self) -> RwLockWriteGuard<'_, BTreeMap<ObjectId, StoredObject>> {
        self.objects.write().expect("lock poisoned")
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        Ok(self.objects().get(id).cloned())
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        if id.is_null() {
            return Err(StoreError::NullObjectId);
        }
        self.objects_mut()
            .entry(id)
            .or_insert_with(|| object.clone());
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.objects().contains_key(id))
    }

    fn delete(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.objects_mut().remove(id).is_some())
    }

    fn find_by_prefix(&self, hex_prefix: &str) -> StoreResult<Vec<ObjectId>> {
        Ok(self
            .objects()
            .keys()
            .filter(|id| id.has_hex_prefix(hex_prefix))
            .copied()
            .collect())
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("objects", &self.len())
            .finish()
    }
}
