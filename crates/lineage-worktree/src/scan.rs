//! Compare files on disk against a committed tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use lineage_store::{Blob, EntryMode, ObjectStore};
use lineage_types::{ObjectId, TreeId};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{WorktreeError, WorktreeResult};
use crate::status::{WorkdirStatus, WorktreeStatus};

/// Name of the repository metadata directory, never treated as content.
pub const METADATA_DIR: &str = ".lineage";

/// Flatten a tree into `path -> (mode, blob id)` for every non-directory
/// entry beneath it. Paths are slash-separated.
pub fn flatten_tree(
    store: &dyn ObjectStore,
    tree: &TreeId,
) -> WorktreeResult<BTreeMap<String, (EntryMode, ObjectId)>> {
    let mut files = BTreeMap::new();
    flatten_into(store, tree, "", &mut files)?;
    Ok(files)
}

fn flatten_into(
    store: &dyn ObjectStore,
    tree: &TreeId,
    prefix: &str,
    files: &mut BTreeMap<String, (EntryMode, ObjectId)>,
) -> WorktreeResult<()> {
    for entry in store.read_tree(tree)?.entries {
        let path = if prefix.is_empty() {
            entry.name.clone()
        } else {
            format!("{prefix}/{}", entry.name)
        };
        if entry.mode.is_directory() {
            flatten_into(store, &entry.object_id, &path, files)?;
        } else {
            files.insert(path, (entry.mode, entry.object_id));
        }
    }
    Ok(())
}

/// Scan `root` and compare every file with `head_tree`.
///
/// Files are hashed as blobs; a tracked file counts as modified when its
/// content id differs. With no `head_tree` every file is untracked. The
/// metadata directory at the root is skipped, and entries that cannot be
/// read are logged and left out of the report.
pub fn scan_workdir(
    root: &Path,
    store: &dyn ObjectStore,
    head_tree: Option<&TreeId>,
) -> WorktreeResult<WorkdirStatus> {
    if !root.is_dir() {
        return Err(WorktreeError::NotADirectory(root.to_path_buf()));
    }
    let mut tracked = match head_tree {
        Some(tree) => flatten_tree(store, tree)?,
        None => BTreeMap::new(),
    };
    let mut status = WorkdirStatus::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.depth() == 1 && e.file_name() == METADATA_DIR));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable worktree entry");
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }
        let Some(path) = relative_path(root, entry.path()) else {
            warn!(path = %entry.path().display(), "skipping non UTF-8 path");
            continue;
        };

        let content = if entry.file_type().is_symlink() {
            fs::read_link(entry.path())
                .map(|target| target.to_string_lossy().into_owned().into_bytes())
        } else {
            fs::read(entry.path())
        };
        let content = match content {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path, error = %e, "skipping unreadable worktree file");
                continue;
            }
        };

        let id = Blob::new(content).id();
        match tracked.remove(&path) {
            Some((_, committed)) if committed == id => {}
            Some(_) => status.modified.push(path),
            None => status.untracked.push(path),
        }
    }
    status.deleted.extend(tracked.into_keys());

    debug!(
        root = %root.display(),
        modified = status.modified.len(),
        untracked = status.untracked.len(),
        deleted = status.deleted.len(),
        "scanned working directory"
    );
    Ok(status)
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = rel.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}

/// A working directory checked against a committed tree when asked.
pub struct Workdir<'a> {
    root: PathBuf,
    store: &'a dyn ObjectStore,
    head_tree: Option<TreeId>,
}

impl<'a> Workdir<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        store: &'a dyn ObjectStore,
        head_tree: Option<TreeId>,
    ) -> Self {
        Self {
            root: root.into(),
            store,
            head_tree,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full status report.
    pub fn status(&self) -> WorktreeResult<WorkdirStatus> {
        scan_workdir(&self.root, self.store, self.head_tree.as_ref())
    }
}

impl WorktreeStatus for Workdir<'_> {
    fn is_clean(&self) -> WorktreeResult<bool> {
        Ok(self.status()?.is_clean())
    }
}

impl std::fmt::Debug for Workdir<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workdir")
            .field("root", &self.root)
            .field("head_tree", &self.head_tree)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_store::{InMemoryObjectStore, Tree, TreeEntry};

    fn blob(store: &InMemoryObjectStore, content: &[u8]) -> ObjectId {
        store.write(&Blob::new(content.to_vec()).to_stored_object()).unwrap()
    }

    /// `a.txt` = "alpha", `src/lib.rs` = "lib".
    fn committed_tree(store: &InMemoryObjectStore) -> TreeId {
        let src = store
            .write_tree(&Tree::new(vec![TreeEntry::new(
                EntryMode::Regular,
                "lib.rs",
                blob(store, b"lib"),
            )]))
            .unwrap();
        store
            .write_tree(&Tree::new(vec![
                TreeEntry::new(EntryMode::Regular, "a.txt", blob(store, b"alpha")),
                TreeEntry::new(EntryMode::Directory, "src", src),
            ]))
            .unwrap()
    }

    fn checkout(root: &Path) {
        fs::write(root.join("a.txt"), "alpha").unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/lib.rs"), "lib").unwrap();
    }

    #[test]
    fn flatten_tree_lists_nested_files() {
        let store = InMemoryObjectStore::new();
        let tree = committed_tree(&store);
        let files = flatten_tree(&store, &tree).unwrap();
        assert_eq!(files.keys().collect::<Vec<_>>(), vec!["a.txt", "src/lib.rs"]);
    }

    #[test]
    fn matching_checkout_is_clean() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryObjectStore::new();
        let tree = committed_tree(&store);
        checkout(dir.path());
        fs::create_dir_all(dir.path().join(METADATA_DIR).join("objects")).unwrap();
        fs::write(dir.path().join(METADATA_DIR).join("HEAD"), "ref: refs/heads/main").unwrap();

        let status = scan_workdir(dir.path(), &store, Some(&tree)).unwrap();
        assert!(status.is_clean(), "unexpected status: {status:?}");
        assert!(WorktreeStatus::is_clean(&Workdir::new(dir.path(), &store, Some(tree))).unwrap());
    }

    #[test]
    fn detects_modified_untracked_and_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryObjectStore::new();
        let tree = committed_tree(&store);
        checkout(dir.path());

        fs::write(dir.path().join("a.txt"), "changed").unwrap();
        fs::remove_file(dir.path().join("src/lib.rs")).unwrap();
        fs::write(dir.path().join("src/new.rs"), "new").unwrap();

        let status = Workdir::new(dir.path(), &store, Some(tree)).status().unwrap();
        assert_eq!(status.modified, vec!["a.txt"]);
        assert_eq!(status.untracked, vec!["src/new.rs"]);
        assert_eq!(status.deleted, vec!["src/lib.rs"]);
    }

    #[test]
    fn without_head_everything_is_untracked() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryObjectStore::new();
        checkout(dir.path());

        let status = scan_workdir(dir.path(), &store, None).unwrap();
        assert_eq!(status.untracked, vec!["a.txt", "src/lib.rs"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryObjectStore::new();
        let missing = dir.path().join("nope");
        assert!(matches!(
            scan_workdir(&missing, &store, None),
            Err(WorktreeError::NotADirectory(_))
        ));
    }
}
