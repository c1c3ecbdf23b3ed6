//! In-memory reference store for tests and ephemeral use.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use lineage_types::CommitId;

use crate::error::{RefError, Result};
use crate::names::{validate_branch_name, validate_tag_name};
use crate::traits::RefStore;
use crate::types::{Head, Ref};

/// An in-memory implementation of [`RefStore`].
///
/// All data lives in a `HashMap` behind a `RwLock` and is lost when the
/// store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryRefStore {
    refs: RwLock<HashMap<String, Ref>>,
    head: RwLock<Option<Head>>,
}

fn poisoned<T>(e: PoisonError<T>) -> RefError {
    RefError::Serialization(format!("lock poisoned: {e}"))
}

impl InMemoryRefStore {
    /// Create a new empty ref store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RefStore for InMemoryRefStore {
    fn read_ref(&self, name: &str) -> Result<Option<Ref>> {
        let refs = self.refs.read().map_err(poisoned)?;
        Ok(refs.get(name).cloned())
    }

    fn write_ref(&self, name: &str, reference: &Ref) -> Result<()> {
        match reference {
            Ref::Branch { name, .. } => validate_branch_name(name)?,
            Ref::Tag { name, .. } => validate_tag_name(name)?,
        }

        let mut refs = self.refs.write().map_err(poisoned)?;
        if reference.is_tag() && refs.get(name).is_some_and(Ref::is_tag) {
            return Err(RefError::TagImmutable {
                name: name.to_string(),
            });
        }
        refs.insert(name.to_string(), reference.clone());
        Ok(())
    }

    fn delete_ref(&self, name: &str) -> Result<bool> {
        if let Some(Head::Symbolic(current)) = self.head()? {
            if name == format!("refs/heads/{current}") {
                return Err(RefError::DeleteCurrentBranch { name: current });
            }
        }
        let mut refs = self.refs.write().map_err(poisoned)?;
        Ok(refs.remove(name).is_some())
    }

    fn list_refs(&self, prefix: &str) -> Result<Vec<(String, Ref)>> {
        let refs = self.refs.read().map_err(poisoned)?;
        let mut result: Vec<(String, Ref)> = refs
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        result.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(result)
    }

    fn head(&self) -> Result<Option<Head>> {
        Ok(self.head.read().map_err(poisoned)?.clone())
    }

    fn set_head(&self, branch: &str) -> Result<()> {
        validate_branch_name(branch)?;
        *self.head.write().map_err(poisoned)? = Some(Head::Symbolic(branch.to_string()));
        Ok(())
    }

    fn set_head_detached(&self, target: CommitId) -> Result<()> {
        *self.head.write().map_err(poisoned)? = Some(Head::Detached(target));
        Ok(())
    }
}
