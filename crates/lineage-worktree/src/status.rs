//! Working directory status.

use serde::{Deserialize, Serialize};

use crate::error::WorktreeResult;

/// Source of the "is the working directory clean" answer a merge needs.
///
/// Implemented by [`WorkdirStatus`] for a precomputed answer and by
/// [`Workdir`](crate::Workdir), which scans the directory on demand.
pub trait WorktreeStatus {
    fn is_clean(&self) -> WorktreeResult<bool>;
}

/// Paths, relative to the working directory root with `/` separators,
/// that differ from the committed tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkdirStatus {
    /// Tracked, content differs.
    pub modified: Vec<String>,
    /// Present on disk, absent from the tree.
    pub untracked: Vec<String>,
    /// In the tree, absent on disk.
    pub deleted: Vec<String>,
}

impl WorkdirStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_clean(&self) -> bool {
        self.modified.is_empty() && self.untracked.is_empty() && self.deleted.is_empty()
    }
}

impl WorktreeStatus for WorkdirStatus {
    fn is_clean(&self) -> WorktreeResult<bool> {
        Ok(WorkdirStatus::is_clean(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_status_is_clean() {
        let status = WorkdirStatus::new();
        assert!(status.is_clean());
        assert!(WorktreeStatus::is_clean(&status).unwrap());
    }

    #[test]
    fn every_category_dirties() {
        for pick in 0..3 {
            let mut status = WorkdirStatus::new();
            let list = match pick {
                0 => &mut status.modified,
                1 => &mut status.untracked,
                _ => &mut status.deleted,
            };
            list.push("file.txt".to_string());

            let as_trait: &dyn WorktreeStatus = &status;
            assert!(!as_trait.is_clean().unwrap());
        }
    }
}
