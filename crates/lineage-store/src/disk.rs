//! Filesystem-backed object store.
//!
//! Each object lives in its own file at `<root>/<2 hex>/<38 hex>`, holding a
//! bincode-encoded [`StoredObject`]. Writes go to a temporary file in the
//! target directory and are renamed into place, so readers never observe a
//! partially written object. Every read re-hashes the object and rejects it
//! if the content does not match the requested id.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use lineage_types::ObjectId;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// Loose-object store rooted at a directory.
#[derive(Debug, Clone)]
pub struct DiskObjectStore {
    root: PathBuf,
}

impl DiskObjectStore {
    /// Open (or create) an object directory.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The directory holding the object fan-out.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, id: &ObjectId) -> PathBuf {
        let hex = id.to_hex();
        self.root.join(&hex[..2]).join(&hex[2..])
    }

    fn decode(id: &ObjectId, bytes: &[u8]) -> StoreResult<StoredObject> {
        let object: StoredObject = bincode::deserialize(bytes).map_err(|e| {
            StoreError::CorruptObject {
                id: *id,
                reason: e.to_string(),
            }
        })?;
        let computed = object.compute_id();
        if computed != *id {
            return Err(StoreError::HashMismatch {
                id: *id,
                computed,
            });
        }
        Ok(object)
    }
}

impl ObjectStore for DiskObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        match fs::read(self.object_path(id)) {
            Ok(bytes) => Self::decode(id, &bytes).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        if id.is_null() {
            return Err(StoreError::NullObjectId);
        }
        let path = self.object_path(&id);
        if path.exists() {
            return Ok(id);
        }

        let dir = path
            .parent()
            .ok_or_else(|| StoreError::Serialization(format!("no parent for {}", path.display())))?;
        fs::create_dir_all(dir)?;

        let bytes =
            bincode::serialize(object).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        debug!(id = %id.short_hex(), kind = %object.kind, size = object.size, "object written");
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).is_file())
    }

    fn delete(&self, id: &ObjectId) -> StoreResult<bool> {
        match fs::remove_file(self.object_path(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn find_by_prefix(&self, hex_prefix: &str) -> StoreResult<Vec<ObjectId>> {
        let prefix = hex_prefix.to_ascii_lowercase();
        let mut found = Vec::new();

        for fan in fs::read_dir(&self.root)? {
            let fan = fan?;
            let fan_name = fan.file_name().to_string_lossy().into_owned();
            if fan_name.len() != 2 || !fan.file_type()?.is_dir() {
                continue;
            }
            // Skip whole fan-out directories that cannot contain a match.
            let head: String = prefix.chars().take(2).collect();
            if !fan_name.starts_with(&head) {
                continue;
            }
            for entry in fs::read_dir(fan.path())? {
                let entry = entry?;
                let rest = entry.file_name().to_string_lossy().into_owned();
                let Ok(id) = ObjectId::from_hex(&format!("{fan_name}{rest}")) else {
                    continue;
                };
                if id.has_hex_prefix(&prefix) {
                    found.push(id);
                }
            }
        }

        found.sort();
        Ok(found)
    }
}
