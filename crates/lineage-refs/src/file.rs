//! Filesystem-backed reference store.
//!
//! Layout under the repository directory:
//!
//! ```text
//! HEAD                 "ref: refs/heads/<branch>" or a 40-hex commit id
//! refs/heads/<name>    40-hex commit id
//! refs/tags/<name>     40-hex commit id
//! ```
//!
//! Every write goes through a temporary file in the destination directory
//! followed by a rename.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use lineage_types::{CommitId, ObjectId};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{RefError, Result};
use crate::names::{validate_branch_name, validate_tag_name};
use crate::traits::RefStore;
use crate::types::{Head, Ref};

const SYMREF_PREFIX: &str = "ref: refs/heads/";

/// Ref store rooted at a repository metadata directory.
#[derive(Debug, Clone)]
pub struct FileRefStore {
    root: PathBuf,
}

impl FileRefStore {
    /// Open a ref store at `root`, creating `refs/heads` and `refs/tags`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join("refs").join("heads"))?;
        fs::create_dir_all(root.join("refs").join("tags"))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ref_path(&self, name: &str) -> PathBuf {
        name.split('/').fold(self.root.clone(), |path, part| path.join(part))
    }

    fn read_trimmed(path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(text.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_atomic(path: &Path, contents: &str) -> Result<()> {
        let dir = path.parent().ok_or_else(|| RefError::Corrupt {
            name: path.display().to_string(),
            reason: "ref path has no parent directory".into(),
        })?;
        fs::create_dir_all(dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.persist(path).map_err(|e| RefError::Io(e.error))?;
        Ok(())
    }

    fn parse_target(name: &str, text: &str) -> Result<CommitId> {
        ObjectId::from_hex(text).map_err(|e| RefError::Corrupt {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }

    /// Build the typed ref for a canonical name and stored target.
    fn typed(name: &str, target: CommitId) -> Result<Ref> {
        if let Some(branch) = name.strip_prefix("refs/heads/") {
            Ok(Ref::branch(branch, target))
        } else if let Some(tag) = name.strip_prefix("refs/tags/") {
            Ok(Ref::tag(tag, target))
        } else {
            Err(RefError::InvalidRefName {
                name: name.to_string(),
                reason: "expected refs/heads/ or refs/tags/".into(),
            })
        }
    }
}

impl RefStore for FileRefStore {
    fn read_ref(&self, name: &str) -> Result<Option<Ref>> {
        let Some(text) = Self::read_trimmed(&self.ref_path(name))? else {
            return Ok(None);
        };
        let target = Self::parse_target(name, &text)?;
        Self::typed(name, target).map(Some)
    }

    fn write_ref(&self, name: &str, reference: &Ref) -> Result<()> {
        match reference {
            Ref::Branch { name, .. } => validate_branch_name(name)?,
            Ref::Tag { name, .. } => validate_tag_name(name)?,
        }
        if reference.is_tag() && self.read_ref(name)?.is_some_and(|r| r.is_tag()) {
            return Err(RefError::TagImmutable {
                name: name.to_string(),
            });
        }
        Self::write_atomic(&self.ref_path(name), &reference.target().to_hex())?;
        debug!(name, target = %reference.target().short_hex(), "ref updated");
        Ok(())
    }

    fn delete_ref(&self, name: &str) -> Result<bool> {
        if let Some(Head::Symbolic(current)) = self.head()? {
            if name == format!("refs/heads/{current}") {
                return Err(RefError::DeleteCurrentBranch { name: current });
            }
        }
        match fs::remove_file(self.ref_path(name)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list_refs(&self, prefix: &str) -> Result<Vec<(String, Ref)>> {
        let mut result = Vec::new();
        for entry in WalkDir::new(self.root.join("refs")).min_depth(1) {
            let entry = entry.map_err(|e| {
                RefError::Io(e.into_io_error().unwrap_or_else(|| ErrorKind::Other.into()))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let Some(parts) = rel
                .components()
                .map(|c| c.as_os_str().to_str())
                .collect::<Option<Vec<&str>>>()
            else {
                warn!(path = %entry.path().display(), "skipping non UTF-8 ref path");
                continue;
            };
            let name = parts.join("/");
            if !name.starts_with(prefix) {
                continue;
            }
            // Stray files (editor backups, temp files) are not refs.
            match self.read_ref(&name) {
                Ok(Some(reference)) => result.push((name, reference)),
                Ok(None) => {}
                Err(RefError::Corrupt { name, reason }) => {
                    warn!(%name, %reason, "skipping unreadable ref");
                }
                Err(e) => return Err(e),
            }
        }
        result.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(result)
    }

    fn head(&self) -> Result<Option<Head>> {
        let Some(text) = Self::read_trimmed(&self.root.join("HEAD"))? else {
            return Ok(None);
        };
        if let Some(branch) = text.strip_prefix(SYMREF_PREFIX) {
            return Ok(Some(Head::Symbolic(branch.to_string())));
        }
        Self::parse_target("HEAD", &text).map(|id| Some(Head::Detached(id)))
    }

    fn set_head(&self, branch: &str) -> Result<()> {
        validate_branch_name(branch)?;
        Self::write_atomic(&self.root.join("HEAD"), &format!("{SYMREF_PREFIX}{branch}"))
    }

    fn set_head_detached(&self, target: CommitId) -> Result<()> {
        Self::write_atomic(&self.root.join("HEAD"), &target.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u8) -> ObjectId {
        ObjectId::from_hash([n; 20])
    }

    #[test]
    fn refs_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRefStore::open(dir.path()).unwrap();

        store.write_ref("refs/heads/feature/x", &Ref::branch("feature/x", id(1))).unwrap();
        store.write_ref("refs/tags/v1", &Ref::tag("v1", id(2))).unwrap();

        let on_disk = fs::read_to_string(dir.path().join("refs/heads/feature/x")).unwrap();
        assert_eq!(on_disk.trim(), id(1).to_hex());

        let reopened = FileRefStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.read_ref("refs/heads/feature/x").unwrap(),
            Some(Ref::branch("feature/x", id(1)))
        );
        let names: Vec<String> = reopened
            .list_refs("")
            .unwrap()
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["refs/heads/feature/x", "refs/tags/v1"]);
        assert_eq!(reopened.tags().unwrap().len(), 1);
    }

    #[test]
    fn head_symbolic_and_detached() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRefStore::open(dir.path()).unwrap();
        assert!(store.head().unwrap().is_none());

        store.set_head("main").unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("HEAD")).unwrap().trim(),
            "ref: refs/heads/main"
        );
        assert_eq!(store.head().unwrap(), Some(Head::Symbolic("main".into())));

        store.set_head_detached(id(5)).unwrap();
        assert_eq!(store.head().unwrap(), Some(Head::Detached(id(5))));
    }

    #[test]
    fn corrupt_ref_is_reported_but_skipped_in_listing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRefStore::open(dir.path()).unwrap();
        store.write_ref("refs/heads/good", &Ref::branch("good", id(1))).unwrap();
        fs::write(dir.path().join("refs/heads/broken"), "not hex").unwrap();

        assert!(matches!(
            store.read_ref("refs/heads/broken"),
            Err(RefError::Corrupt { .. })
        ));
        assert_eq!(store.branches().unwrap().len(), 1);
    }

    #[test]
    fn tag_cannot_be_overwritten_and_current_branch_is_protected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRefStore::open(dir.path()).unwrap();
        store.write_ref("refs/tags/v1", &Ref::tag("v1", id(1))).unwrap();
        assert!(matches!(
            store.write_ref("refs/tags/v1", &Ref::tag("v1", id(2))),
            Err(RefError::TagImmutable { .. })
        ));

        store.write_ref("refs/heads/main", &Ref::branch("main", id(1))).unwrap();
        store.set_head("main").unwrap();
        assert!(store.delete_ref("refs/heads/main").is_err());
        assert!(!store.delete_ref("refs/heads/absent").unwrap());
    }
}
