//! Tree-level diff: compare two trees and produce a list of changes.
//!
//! Entries are paired by name at each level. Directories present on both
//! sides with different ids are compared recursively; a directory present
//! on one side only contributes every file beneath it. Paths in the result
//! are slash-separated and relative to the compared trees.

use std::collections::{BTreeMap, HashMap};

use lineage_store::{EntryMode, ObjectStore, StoreError, Tree, TreeEntry};
use lineage_types::{ObjectId, TreeId};
use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};

/// The result of comparing two trees.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Changes between the old and new trees.
    pub changes: Vec<TreeChange>,
}

impl ChangeSet {
    /// Create an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Paths touched by the change set, in report order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.changes.iter().map(TreeChange::path)
    }
}

/// A single file-level change between two trees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeChange {
    /// A new entry was added.
    Added {
        path: String,
        new_id: ObjectId,
        mode: EntryMode,
    },
    /// An existing entry was deleted.
    Deleted {
        path: String,
        old_id: ObjectId,
        mode: EntryMode,
    },
    /// Same path, different content.
    Modified {
        path: String,
        old_id: ObjectId,
        new_id: ObjectId,
        mode: EntryMode,
    },
    /// Content moved to a new path unchanged.
    Renamed {
        old_path: String,
        new_path: String,
        id: ObjectId,
    },
    /// Same content, different mode.
    ModeChanged {
        path: String,
        id: ObjectId,
        old_mode: EntryMode,
        new_mode: EntryMode,
    },
}

impl TreeChange {
    /// The path the change applies to; the new path for renames.
    pub fn path(&self) -> &str {
        match self {
            Self::Added { path, .. }
            | Self::Deleted { path, .. }
            | Self::Modified { path, .. }
            | Self::ModeChanged { path, .. } => path,
            Self::Renamed { new_path, .. } => new_path,
        }
    }
}

/// Compare two trees and produce a change set.
///
/// - `old_tree`: the previous tree (or `None` for an empty tree).
/// - `new_tree`: the current tree.
///
/// Trees are read from the store as they are reached.
pub fn diff_trees(
    store: &dyn ObjectStore,
    old_tree: Option<&TreeId>,
    new_tree: &TreeId,
) -> DiffResult<ChangeSet> {
    let mut walk = Walk::default();
    let old = match old_tree {
        Some(id) => Some(load_tree(store, id)?),
        None => None,
    };
    let new = load_tree(store, new_tree)?;
    walk.compare(store, "", old.as_ref(), Some(&new))?;
    Ok(walk.finish())
}

fn load_tree(store: &dyn ObjectStore, id: &TreeId) -> DiffResult<Tree> {
    match store.read_tree(id) {
        Ok(tree) => Ok(tree),
        Err(StoreError::NotFound(missing)) => Err(DiffError::ObjectNotFound(missing)),
        Err(e) => Err(e.into()),
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

#[derive(Default)]
struct Walk {
    changes: Vec<TreeChange>,
    deleted: Vec<(String, TreeEntry)>,
    added: Vec<(String, TreeEntry)>,
}

impl Walk {
    fn compare(
        &mut self,
        store: &dyn ObjectStore,
        prefix: &str,
        old: Option<&Tree>,
        new: Option<&Tree>,
    ) -> DiffResult<()> {
        let mut paired: BTreeMap<&str, (Option<&TreeEntry>, Option<&TreeEntry>)> = BTreeMap::new();
        for entry in old.map(|t| t.entries.as_slice()).unwrap_or_default() {
            paired.entry(entry.name.as_str()).or_default().0 = Some(entry);
        }
        for entry in new.map(|t| t.entries.as_slice()).unwrap_or_default() {
            paired.entry(entry.name.as_str()).or_default().1 = Some(entry);
        }

        for (name, sides) in paired {
            let path = join(prefix, name);
            match sides {
                (Some(o), Some(n)) if o.object_id == n.object_id && o.mode == n.mode => {}
                (Some(o), Some(n)) if o.mode.is_directory() && n.mode.is_directory() => {
                    let ot = load_tree(store, &o.object_id)?;
                    let nt = load_tree(store, &n.object_id)?;
                    self.compare(store, &path, Some(&ot), Some(&nt))?;
                }
                (Some(o), Some(n)) if o.mode.is_directory() != n.mode.is_directory() => {
                    self.removed(store, path.clone(), o)?;
                    self.inserted(store, path, n)?;
                }
                (Some(o), Some(n)) if o.object_id == n.object_id => {
                    self.changes.push(TreeChange::ModeChanged {
                        path,
                        id: o.object_id,
                        old_mode: o.mode,
                        new_mode: n.mode,
                    });
                }
                (Some(o), Some(n)) => {
                    self.changes.push(TreeChange::Modified {
                        path,
                        old_id: o.object_id,
                        new_id: n.object_id,
                        mode: n.mode,
                    });
                }
                (Some(o), None) => self.removed(store, path, o)?,
                (None, Some(n)) => self.inserted(store, path, n)?,
                (None, None) => {}
            }
        }
        Ok(())
    }

    fn removed(
        &mut self,
        store: &dyn ObjectStore,
        path: String,
        entry: &TreeEntry,
    ) -> DiffResult<()> {
        if entry.mode.is_directory() {
            let tree = load_tree(store, &entry.object_id)?;
            return self.compare(store, &path, Some(&tree), None);
        }
        self.deleted.push((path, entry.clone()));
        Ok(())
    }

    fn inserted(
        &mut self,
        store: &dyn ObjectStore,
        path: String,
        entry: &TreeEntry,
    ) -> DiffResult<()> {
        if entry.mode.is_directory() {
            let tree = load_tree(store, &entry.object_id)?;
            return self.compare(store, &path, None, Some(&tree));
        }
        self.added.push((path, entry.clone()));
        Ok(())
    }

    /// Pair deletions with additions of identical content, then flush the rest.
    fn finish(mut self) -> ChangeSet {
        let mut by_content: HashMap<ObjectId, Vec<usize>> = HashMap::new();
        for (i, (_, entry)) in self.deleted.iter().enumerate().rev() {
            by_content.entry(entry.object_id).or_default().push(i);
        }

        let mut renamed = vec![false; self.deleted.len()];
        let mut remaining_adds = Vec::new();
        for (path, entry) in self.added {
            let source = by_content.get_mut(&entry.object_id).and_then(Vec::pop);
            match source {
                Some(i) => {
                    renamed[i] = true;
                    self.changes.push(TreeChange::Renamed {
                        old_path: self.deleted[i].0.clone(),
                        new_path: path,
                        id: entry.object_id,
                    });
                }
                None => remaining_adds.push((path, entry)),
            }
        }

        for (i, (path, entry)) in self.deleted.into_iter().enumerate() {
            if !renamed[i] {
                self.changes.push(TreeChange::Deleted {
                    path,
                    old_id: entry.object_id,
                    mode: entry.mode,
                });
            }
        }
        for (path, entry) in remaining_adds {
            self.changes.push(TreeChange::Added {
                path,
                new_id: entry.object_id,
                mode: entry.mode,
            });
        }

        ChangeSet {
            changes: self.changes,
        }
    }
}
