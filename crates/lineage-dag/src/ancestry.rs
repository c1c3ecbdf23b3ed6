//! Reachability queries.

use std::ops::ControlFlow;

use lineage_store::ObjectStore;

use crate::error::DagResult;
use crate::iter::FilterCommitIter;
use crate::node::CommitNode;

/// Whether `candidate` is reachable from `of` by following parent edges.
///
/// Every commit is its own ancestor. The walk ends as soon as the candidate
/// is found.
pub fn is_ancestor(
    store: &dyn ObjectStore,
    candidate: &CommitNode,
    of: &CommitNode,
) -> DagResult<bool> {
    if candidate.id() == of.id() {
        return Ok(true);
    }

    let target = candidate.id();
    let mut found = false;
    FilterCommitIter::unfiltered(store, of.clone()).for_each_commit(|commit| {
        if commit.id() == target {
            found = true;
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })?;
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestGraph;

    #[test]
    fn linear_history() {
        let g = TestGraph::new();
        let a = g.commit("a", &[]);
        let b = g.commit("b", &[a]);
        let c = g.commit("c", &[b]);
        let (a, c) = (g.node(&a), g.node(&c));

        assert!(is_ancestor(&g.store, &a, &c).unwrap());
        assert!(!is_ancestor(&g.store, &c, &a).unwrap());
    }

    #[test]
    fn commit_is_its_own_ancestor() {
        let g = TestGraph::new();
        let a = g.node(&g.commit("a", &[]));
        assert!(is_ancestor(&g.store, &a, &a).unwrap());
    }

    #[test]
    fn second_parent_history_counts() {
        let g = TestGraph::new();
        let base = g.commit("base", &[]);
        let main = g.commit("main", &[base]);
        let topic = g.commit("topic", &[base]);
        let merge = g.commit("merge", &[main, topic]);

        assert!(is_ancestor(&g.store, &g.node(&topic), &g.node(&merge)).unwrap());
        assert!(!is_ancestor(&g.store, &g.node(&topic), &g.node(&main)).unwrap());
    }

    #[test]
    fn found_before_unresolvable_history() {
        let g = TestGraph::new();
        let ghost = lineage_store::Blob::new(b"shallow".to_vec()).id();
        let x = g.node(&g.commit("x", &[ghost]));
        let y = g.node(&g.commit("y", &[x.id()]));

        assert!(is_ancestor(&g.store, &x, &y).unwrap());
        assert!(is_ancestor(&g.store, &y, &x).is_err());
    }

    #[test]
    fn unrelated_histories() {
        let g = TestGraph::new();
        let x = g.node(&g.commit("x", &[]));
        let y = g.node(&g.commit("y", &[]));
        assert!(!is_ancestor(&g.store, &x, &y).unwrap());
        assert!(!is_ancestor(&g.store, &y, &x).unwrap());
    }
}
