//! Revision expressions: turning `main~2`, `v1.0^2` or `3f2a9c` into a
//! commit id.
//!
//! Grammar:
//!
//! ```text
//! revision := base suffix*
//! base     := "HEAD" | refs/... | tag | branch | hex id (>= 4 chars)
//! suffix   := "~" [n] | "^" [n]
//! ```
//!
//! `~n` follows the first parent `n` times; `^n` selects the `n`-th parent,
//! and `^0` is the commit itself. A bare `~` or `^` means 1.

use lineage_dag::CommitNode;
use lineage_store::{ObjectKind, ObjectStore};
use lineage_types::{CommitId, ObjectId};
use tracing::debug;

use crate::error::{RefError, Result};
use crate::traits::RefStore;

/// Shortest accepted abbreviated commit id.
pub const MIN_ABBREV_LEN: usize = 4;

const FULL_HEX_LEN: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// `~n`: walk `n` first parents.
    Ancestor(usize),
    /// `^n`: the `n`-th parent, `^0` being the commit itself.
    Parent(usize),
}

/// Resolve a revision expression to a commit id.
///
/// Names are tried before hex ids, in the order `HEAD`, `refs/...`,
/// `refs/tags/<name>`, `refs/heads/<name>`. A full 40-character id is
/// returned as is without checking that the commit exists; abbreviated ids
/// must match exactly one stored commit.
pub fn resolve_revision(
    store: &dyn ObjectStore,
    refs: &dyn RefStore,
    expr: &str,
) -> Result<CommitId> {
    let (base, steps) = parse(expr)?;
    let mut current = resolve_base(store, refs, base, expr)?;

    for step in steps {
        current = match step {
            Step::Parent(0) => current,
            Step::Parent(n) => nth_parent(store, &current, n, expr)?,
            Step::Ancestor(n) => {
                let mut id = current;
                for _ in 0..n {
                    id = nth_parent(store, &id, 1, expr)?;
                }
                id
            }
        };
    }

    debug!(revision = expr, commit = %current.short_hex(), "resolved revision");
    Ok(current)
}

fn parse(expr: &str) -> Result<(&str, Vec<Step>)> {
    let invalid = || RefError::InvalidRevision(expr.to_string());

    let split = expr.find(['~', '^']).unwrap_or(expr.len());
    let (base, mut rest) = expr.split_at(split);
    if base.is_empty() || base.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let mut steps = Vec::new();
    while let Some(op) = rest.chars().next() {
        rest = &rest[op.len_utf8()..];
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        let count = if digits == 0 {
            1
        } else {
            rest[..digits].parse::<usize>().map_err(|_| invalid())?
        };
        rest = &rest[digits..];
        steps.push(match op {
            '~' => Step::Ancestor(count),
            '^' => Step::Parent(count),
            _ => return Err(invalid()),
        });
    }
    Ok((base, steps))
}

fn resolve_base(
    store: &dyn ObjectStore,
    refs: &dyn RefStore,
    base: &str,
    expr: &str,
) -> Result<CommitId> {
    let unknown = || RefError::UnknownRevision(expr.to_string());

    if base == "HEAD" {
        return refs.head_commit()?.ok_or_else(unknown);
    }
    if base.starts_with("refs/") {
        return refs.read_ref(base)?.map(|r| r.target()).ok_or_else(unknown);
    }
    for candidate in [format!("refs/tags/{base}"), format!("refs/heads/{base}")] {
        if let Some(reference) = refs.read_ref(&candidate)? {
            return Ok(reference.target());
        }
    }

    if !base.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(unknown());
    }
    if base.len() == FULL_HEX_LEN {
        return ObjectId::from_hex(base).map_err(|_| RefError::InvalidRevision(expr.to_string()));
    }
    if base.len() < MIN_ABBREV_LEN || base.len() > FULL_HEX_LEN {
        return Err(unknown());
    }

    let mut commits = Vec::new();
    for id in store.find_by_prefix(base)? {
        if store.read(&id)?.is_some_and(|o| o.kind == ObjectKind::Commit) {
            commits.push(id);
        }
    }
    match commits.as_slice() {
        [] => Err(unknown()),
        [only] => Ok(*only),
        many => Err(RefError::AmbiguousRevision {
            prefix: base.to_string(),
            matches: many.len(),
        }),
    }
}

fn nth_parent(store: &dyn ObjectStore, id: &CommitId, n: usize, expr: &str) -> Result<CommitId> {
    let node = CommitNode::load(store, id)?;
    node.parent_ids()
        .get(n - 1)
        .copied()
        .ok_or_else(|| RefError::UnknownRevision(expr.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryRefStore;
    use crate::types::Ref;
    use lineage_store::{Commit, InMemoryObjectStore, Tree};
    use lineage_types::Signature;

    struct Fixture {
        store: InMemoryObjectStore,
        refs: InMemoryRefStore,
        root: CommitId,
        left: CommitId,
        right: CommitId,
        merge: CommitId,
    }

    /// root <- left <- merge(left, right); root <- right. `main` at merge.
    fn fixture() -> Fixture {
        let store = InMemoryObjectStore::new();
        let tree = store.write_tree(&Tree::empty()).unwrap();
        let commit = |msg: &str, parents: Vec<CommitId>, ts: i64| {
            store
                .write_commit(&Commit::new(tree, parents, Signature::new("t", "t@x", ts), msg))
                .unwrap()
        };
        let root = commit("root", vec![], 1);
        let left = commit("left", vec![root], 2);
        let right = commit("right", vec![root], 3);
        let merge = commit("merge", vec![left, right], 4);

        let refs = InMemoryRefStore::new();
        refs.write_ref("refs/heads/main", &Ref::branch("main", merge)).unwrap();
        refs.write_ref("refs/heads/side", &Ref::branch("side", right)).unwrap();
        refs.write_ref("refs/tags/v1", &Ref::tag("v1", root)).unwrap();
        refs.set_head("main").unwrap();

        Fixture {
            store,
            refs,
            root,
            left,
            right,
            merge,
        }
    }

    fn resolve(f: &Fixture, expr: &str) -> Result<CommitId> {
        resolve_revision(&f.store, &f.refs, expr)
    }

    #[test]
    fn names_resolve() {
        let f = fixture();
        assert_eq!(resolve(&f, "HEAD").unwrap(), f.merge);
        assert_eq!(resolve(&f, "main").unwrap(), f.merge);
        assert_eq!(resolve(&f, "refs/heads/side").unwrap(), f.right);
        assert_eq!(resolve(&f, "v1").unwrap(), f.root);
    }

    #[test]
    fn parent_suffixes() {
        let f = fixture();
        assert_eq!(resolve(&f, "main^").unwrap(), f.left);
        assert_eq!(resolve(&f, "main^1").unwrap(), f.left);
        assert_eq!(resolve(&f, "main^2").unwrap(), f.right);
        assert_eq!(resolve(&f, "main^0").unwrap(), f.merge);
        assert_eq!(resolve(&f, "main~").unwrap(), f.left);
        assert_eq!(resolve(&f, "main~2").unwrap(), f.root);
        assert_eq!(resolve(&f, "HEAD^2~1").unwrap(), f.root);
        assert_eq!(resolve(&f, "main~1^").unwrap(), f.root);
    }

    #[test]
    fn hex_ids_full_and_abbreviated() {
        let f = fixture();
        assert_eq!(resolve(&f, &f.left.to_hex()).unwrap(), f.left);
        assert_eq!(resolve(&f, &f.left.to_hex()[..12]).unwrap(), f.left);
        assert_eq!(resolve(&f, &f.right.to_hex().to_uppercase()[..10]).unwrap(), f.right);
    }

    #[test]
    fn errors_are_classified() {
        let f = fixture();
        assert!(matches!(resolve(&f, ""), Err(RefError::InvalidRevision(_))));
        assert!(matches!(resolve(&f, "~1"), Err(RefError::InvalidRevision(_))));
        assert!(matches!(resolve(&f, "main~x"), Err(RefError::InvalidRevision(_))));
        assert!(matches!(resolve(&f, "nope"), Err(RefError::UnknownRevision(_))));
        assert!(matches!(resolve(&f, "abc"), Err(RefError::UnknownRevision(_))));
        assert!(matches!(resolve(&f, "main^3"), Err(RefError::UnknownRevision(_))));
        assert!(matches!(resolve(&f, "v1~1"), Err(RefError::UnknownRevision(_))));
    }

    #[test]
    fn ambiguous_prefix_is_reported() {
        let store = InMemoryObjectStore::new();
        let tree = store.write_tree(&Tree::empty()).unwrap();
        let refs = InMemoryRefStore::new();

        // Write commits until two share a four-character prefix.
        let mut seen: std::collections::HashMap<String, CommitId> = Default::default();
        let prefix = (0..10_000)
            .find_map(|i| {
                let id = store
                    .write_commit(&Commit::new(tree, vec![], Signature::new("t", "t@x", i), "c"))
                    .unwrap();
                let head = id.to_hex()[..4].to_string();
                seen.insert(head.clone(), id).map(|_| head)
            })
            .expect("a four-character collision within 10k commits");

        assert!(matches!(
            resolve_revision(&store, &refs, &prefix),
            Err(RefError::AmbiguousRevision { matches: 2, .. })
        ));
    }
}
