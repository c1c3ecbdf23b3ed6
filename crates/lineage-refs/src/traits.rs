//! The [`RefStore`] trait defining the reference storage interface.

use lineage_types::CommitId;

use crate::error::Result;
use crate::types::{Head, Ref};

/// Storage backend for named references.
///
/// Implementations must be thread-safe (`Send + Sync`). The namespace is
/// hierarchical: `refs/heads/*` for branches and `refs/tags/*` for tags.
pub trait RefStore: Send + Sync {
    /// Read a ref by its canonical name (e.g. "refs/heads/main").
    ///
    /// Returns `Ok(None)` if the ref does not exist.
    fn read_ref(&self, name: &str) -> Result<Option<Ref>>;

    /// Write (create or update) a ref at the given canonical name.
    ///
    /// Fails if a tag already exists at that name.
    fn write_ref(&self, name: &str, reference: &Ref) -> Result<()>;

    /// Delete a ref by canonical name. Returns `Ok(true)` if it existed.
    fn delete_ref(&self, name: &str) -> Result<bool>;

    /// List all refs whose canonical name starts with `prefix`, sorted.
    fn list_refs(&self, prefix: &str) -> Result<Vec<(String, Ref)>>;

    /// Read the current HEAD state, `Ok(None)` if HEAD was never set.
    fn head(&self) -> Result<Option<Head>>;

    /// Set HEAD to point at a branch (symbolic ref).
    fn set_head(&self, branch: &str) -> Result<()>;

    /// Detach HEAD at a commit.
    fn set_head_detached(&self, target: CommitId) -> Result<()>;

    /// List all branch refs.
    fn branches(&self) -> Result<Vec<(String, Ref)>> {
        self.list_refs("refs/heads/")
    }

    /// List all tag refs.
    fn tags(&self) -> Result<Vec<(String, Ref)>> {
        self.list_refs("refs/tags/")
    }

    /// Commit HEAD currently resolves to.
    ///
    /// `Ok(None)` when HEAD is unset or names a branch with no commits yet.
    fn head_commit(&self) -> Result<Option<CommitId>> {
        match self.head()? {
            Some(Head::Detached(id)) => Ok(Some(id)),
            Some(Head::Symbolic(branch)) => Ok(self
                .read_ref(&format!("refs/heads/{branch}"))?
                .map(|r| r.target())),
            None => Ok(None),
        }
    }
}
