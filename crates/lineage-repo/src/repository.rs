use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use lineage_dag::{CommitNode, FilterCommitIter};
use lineage_merge::{MergeOptions, MergeOutcome};
use lineage_refs::{resolve_revision, FileRefStore, Head, Ref, RefStore};
use lineage_store::{Blob, Commit, DiskObjectStore, EntryMode, ObjectStore, Tree, TreeEntry};
use lineage_types::{CommitId, Signature, TreeId};
use lineage_worktree::{Workdir, WorkdirStatus, METADATA_DIR};
use tracing::{info, warn};

use crate::config::RepoConfig;
use crate::error::{RepoError, RepoResult};

const DEFAULT_BRANCH: &str = "main";

/// A lineage repository on disk.
pub struct Repository {
    workdir: PathBuf,
    meta: PathBuf,
    store: DiskObjectStore,
    refs: FileRefStore,
    config: RepoConfig,
}

impl Repository {
    /// Create a new repository in `path` with HEAD on an unborn `main`.
    pub fn init(path: impl AsRef<Path>) -> RepoResult<Self> {
        let workdir = path.as_ref().to_path_buf();
        let meta = workdir.join(METADATA_DIR);
        if meta.exists() {
            return Err(RepoError::AlreadyInitialized(workdir));
        }
        fs::create_dir_all(&meta)?;

        let store = DiskObjectStore::open(meta.join("objects"))?;
        let refs = FileRefStore::open(&meta)?;
        refs.set_head(DEFAULT_BRANCH)?;
        let config = RepoConfig::default();
        config.save(&meta.join("config.toml"))?;

        info!(path = %workdir.display(), "initialized repository");
        Ok(Self {
            workdir,
            meta,
            store,
            refs,
            config,
        })
    }

    /// Open an existing repository rooted at `path`.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        let workdir = path.as_ref().to_path_buf();
        let meta = workdir.join(METADATA_DIR);
        if !meta.is_dir() {
            return Err(RepoError::NotARepository(workdir));
        }
        let store = DiskObjectStore::open(meta.join("objects"))?;
        let refs = FileRefStore::open(&meta)?;
        let config = RepoConfig::load(&meta.join("config.toml"))?;
        Ok(Self {
            workdir,
            meta,
            store,
            refs,
            config,
        })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn meta_dir(&self) -> &Path {
        &self.meta
    }

    pub fn store(&self) -> &DiskObjectStore {
        &self.store
    }

    pub fn refs(&self) -> &FileRefStore {
        &self.refs
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    // ---------------------------------------------------------------
    // History
    // ---------------------------------------------------------------

    /// Resolve a revision expression to a commit id.
    pub fn resolve(&self, revision: &str) -> RepoResult<CommitId> {
        Ok(resolve_revision(&self.store, &self.refs, revision)?)
    }

    /// Load a commit by id.
    pub fn commit(&self, id: &CommitId) -> RepoResult<CommitNode> {
        Ok(CommitNode::load(&self.store, id)?)
    }

    /// Resolve a revision and load the commit it names.
    pub fn resolve_commit(&self, revision: &str) -> RepoResult<CommitNode> {
        self.commit(&self.resolve(revision)?)
    }

    /// Commit HEAD points at, if any.
    pub fn head_commit(&self) -> RepoResult<Option<CommitNode>> {
        match self.refs.head_commit()? {
            Some(id) => Ok(Some(self.commit(&id)?)),
            None => Ok(None),
        }
    }

    /// Breadth-first history from `start`, at most `limit` commits.
    pub fn log(&self, start: &CommitNode, limit: Option<usize>) -> RepoResult<Vec<CommitNode>> {
        let walk = FilterCommitIter::unfiltered(&self.store, start.clone());
        let mut commits = Vec::new();
        for commit in walk.take(limit.unwrap_or(usize::MAX)) {
            commits.push(commit?);
        }
        Ok(commits)
    }

    // ---------------------------------------------------------------
    // Working directory
    // ---------------------------------------------------------------

    /// The working directory compared against HEAD's tree.
    pub fn worktree(&self) -> RepoResult<Workdir<'_>> {
        let head_tree = self.head_commit()?.map(|c| c.tree());
        Ok(Workdir::new(&self.workdir, &self.store, head_tree))
    }

    pub fn worktree_status(&self) -> RepoResult<WorkdirStatus> {
        Ok(self.worktree()?.status()?)
    }

    /// Record the working directory as a new commit on the current branch.
    ///
    /// The new commit's parent is the current HEAD commit, if any. HEAD's
    /// branch is advanced; a detached HEAD moves to the new commit.
    pub fn commit_workdir(&self, message: &str) -> RepoResult<CommitId> {
        let tree = match self.write_dir(&self.workdir)? {
            Some(tree) => tree,
            None => self.store.write_tree(&Tree::empty())?,
        };
        let parents: Vec<CommitId> = self.refs.head_commit()?.into_iter().collect();
        let id = self.commit_tree(tree, parents, message)?;

        match self.refs.head()? {
            Some(Head::Symbolic(branch)) => self.set_branch(&branch, id)?,
            _ => self.refs.set_head_detached(id)?,
        }
        Ok(id)
    }

    /// Write a commit object with the configured identity.
    pub fn commit_tree(
        &self,
        tree: TreeId,
        parents: Vec<CommitId>,
        message: &str,
    ) -> RepoResult<CommitId> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();
        let signature = Signature::new(&self.config.user.name, &self.config.user.email, timestamp);
        let commit = Commit::new(tree, parents, signature, message);
        let id = self.store.write_commit(&commit)?;
        info!(
            commit = %id.short_hex(),
            summary = message.lines().next().unwrap_or_default(),
            "created commit"
        );
        Ok(id)
    }

    /// Point a branch at a commit, creating it if needed.
    pub fn set_branch(&self, name: &str, target: CommitId) -> RepoResult<()> {
        let branch = Ref::branch(name, target);
        self.refs.write_ref(&branch.canonical_name(), &branch)?;
        Ok(())
    }

    /// Snapshot a directory into trees and blobs; `None` if it holds no files.
    fn write_dir(&self, dir: &Path) -> RepoResult<Option<TreeId>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let Ok(name) = entry.file_name().into_string() else {
                warn!(path = %entry.path().display(), "skipping non UTF-8 path");
                continue;
            };
            if dir == self.workdir.as_path() && name == METADATA_DIR {
                continue;
            }

            let file_type = entry.file_type()?;
            let path = entry.path();
            if file_type.is_dir() {
                if let Some(tree) = self.write_dir(&path)? {
                    entries.push(TreeEntry::new(EntryMode::Directory, name, tree));
                }
            } else if file_type.is_symlink() {
                let target = fs::read_link(&path)?;
                let blob = Blob::new(target.to_string_lossy().into_owned().into_bytes());
                let id = self.store.write(&blob.to_stored_object())?;
                entries.push(TreeEntry::new(EntryMode::Symlink, name, id));
            } else {
                let blob = Blob::new(fs::read(&path)?);
                let id = self.store.write(&blob.to_stored_object())?;
                entries.push(TreeEntry::new(file_mode(&entry.metadata()?), name, id));
            }
        }

        if entries.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.store.write_tree(&Tree::new(entries))?))
    }

    // ---------------------------------------------------------------
    // Merge
    // ---------------------------------------------------------------

    /// Merge options preset by the repository config.
    pub fn merge_options(&self) -> MergeOptions {
        self.config.merge_options()
    }

    /// Merge the commit named by `target` into the one named by `base`.
    ///
    /// Refs are left untouched; a fast-forward outcome names the commit
    /// `base` would move to.
    pub fn merge(
        &self,
        base: &str,
        target: &str,
        options: &MergeOptions,
    ) -> RepoResult<MergeOutcome> {
        let base = self.resolve_commit(base)?;
        let target = self.resolve_commit(target)?;
        let worktree = self.worktree()?;
        Ok(lineage_merge::merge(
            &self.store,
            &worktree,
            &base,
            &target,
            options,
        )?)
    }
}

#[cfg(unix)]
fn file_mode(metadata: &fs::Metadata) -> EntryMode {
    use std::os::unix::fs::PermissionsExt;
    if metadata.permissions().mode() & 0o111 != 0 {
        EntryMode::Executable
    } else {
        EntryMode::Regular
    }
}

#[cfg(not(unix))]
fn file_mode(_metadata: &fs::Metadata) -> EntryMode {
    EntryMode::Regular
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("workdir", &self.workdir)
            .field("config", &self.config)
            .finish()
    }
}
