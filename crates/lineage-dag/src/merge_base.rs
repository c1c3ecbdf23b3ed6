//! Best common ancestors of two commits.
//!
//! Both commits paint their history with a side flag. A commit painted by
//! both sides is a common ancestor; it then paints its own ancestors stale,
//! since anything behind a common ancestor cannot be a *best* one. The walk
//! ends when the queue holds only stale work. Candidates that survive are
//! reduced with [`independents`] so none of them reaches another.

use std::collections::{HashMap, VecDeque};

use lineage_store::ObjectStore;
use lineage_types::CommitId;
use tracing::debug;

use crate::error::DagResult;
use crate::independents::independents;
use crate::node::CommitNode;

/// Best common ancestors. Usually one; several under criss-cross merges;
/// empty when the histories are unrelated.
pub type AncestorSet = Vec<CommitNode>;

const SIDE_A: u8 = 1 << 0;
const SIDE_B: u8 = 1 << 1;
const BOTH: u8 = SIDE_A | SIDE_B;
const STALE: u8 = 1 << 2;

/// Compute the best common ancestors of `a` and `b`.
///
/// If one commit is an ancestor of the other, the result is exactly that
/// commit. Identical inputs return the input itself. Results are in
/// discovery order.
pub fn merge_base(
    store: &dyn ObjectStore,
    a: &CommitNode,
    b: &CommitNode,
) -> DagResult<AncestorSet> {
    if a.id() == b.id() {
        return Ok(vec![a.clone()]);
    }

    let mut flags: HashMap<CommitId, u8> = HashMap::new();
    let mut nodes: HashMap<CommitId, CommitNode> = HashMap::new();
    nodes.insert(a.id(), a.clone());
    nodes.insert(b.id(), b.clone());

    let mut queue: VecDeque<(CommitId, u8)> = VecDeque::new();
    queue.push_back((a.id(), SIDE_A));
    queue.push_back((b.id(), SIDE_B));
    let mut live = 2usize;
    let mut candidates: Vec<CommitId> = Vec::new();

    while live > 0 {
        let Some((id, incoming)) = queue.pop_front() else {
            break;
        };
        if incoming & STALE == 0 {
            live -= 1;
        }

        let current = flags.get(&id).copied().unwrap_or(0);
        let updated = current | incoming;
        if updated == current {
            continue;
        }
        flags.insert(id, updated);

        if updated & BOTH == BOTH && updated & STALE == 0 && current & BOTH != BOTH {
            if id == a.id() || id == b.id() {
                debug!(base = %id.short_hex(), "merge base is one of the inputs");
                return Ok(vec![nodes[&id].clone()]);
            }
            candidates.push(id);
        }

        let node = match nodes.get(&id) {
            Some(node) => node.clone(),
            None => {
                let node = CommitNode::load(store, &id)?;
                nodes.insert(id, node.clone());
                node
            }
        };

        let outgoing = if updated & BOTH == BOTH {
            updated | STALE
        } else {
            updated
        };
        for parent in node.parent_ids() {
            queue.push_back((*parent, outgoing));
            if outgoing & STALE == 0 {
                live += 1;
            }
        }
    }

    let best: Vec<CommitNode> = candidates
        .iter()
        .filter(|id| flags.get(id).is_some_and(|f| f & STALE == 0))
        .map(|id| nodes[id].clone())
        .collect();

    debug!(
        a = %a.id().short_hex(),
        b = %b.id().short_hex(),
        painted = flags.len(),
        candidates = best.len(),
        "merge base walk finished"
    );

    if best.len() > 1 {
        return independents(store, &best);
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DagError;
    use crate::testutil::TestGraph;
    use lineage_store::Blob;

    fn base_ids(g: &TestGraph, a: &CommitId, b: &CommitId) -> Vec<CommitId> {
        TestGraph::ids(&merge_base(&g.store, &g.node(a), &g.node(b)).unwrap())
    }

    #[test]
    fn same_commit_is_its_own_base() {
        let g = TestGraph::new();
        let a = g.commit("a", &[]);
        assert_eq!(base_ids(&g, &a, &a), vec![a]);
    }

    #[test]
    fn ancestor_input_is_the_base() {
        let g = TestGraph::new();
        let a = g.commit("a", &[]);
        let b = g.commit("b", &[a]);
        let c = g.commit("c", &[b]);

        assert_eq!(base_ids(&g, &a, &c), vec![a]);
        assert_eq!(base_ids(&g, &c, &a), vec![a]);
        assert_eq!(base_ids(&g, &b, &c), vec![b]);
    }

    #[test]
    fn forked_branches_share_fork_point() {
        // root <- fork <- m1 <- m2
        //             \ <- t1
        let g = TestGraph::new();
        let root = g.commit("root", &[]);
        let fork = g.commit("fork", &[root]);
        let m1 = g.commit("m1", &[fork]);
        let m2 = g.commit("m2", &[m1]);
        let t1 = g.commit("t1", &[fork]);

        assert_eq!(base_ids(&g, &m2, &t1), vec![fork]);
        assert_eq!(base_ids(&g, &t1, &m2), vec![fork]);
    }

    #[test]
    fn uneven_branch_lengths_still_find_best_base() {
        // A long side branch whose tip is merged back; the older fork point
        // must not be reported.
        let g = TestGraph::new();
        let root = g.commit("root", &[]);
        let s1 = g.commit("s1", &[root]);
        let s2 = g.commit("s2", &[s1]);
        let s3 = g.commit("s3", &[s2]);
        let m1 = g.commit("m1", &[root]);
        let merged = g.commit("merged", &[m1, s3]);
        let side_tip = g.commit("side tip", &[s3]);

        assert_eq!(base_ids(&g, &merged, &side_tip), vec![s3]);
    }

    #[test]
    fn criss_cross_has_two_bases() {
        //   base <- x <- m1 (x, y)  <- tip1
        //       \ <- y <- m2 (y, x) <- tip2
        let g = TestGraph::new();
        let base = g.commit("base", &[]);
        let x = g.commit("x", &[base]);
        let y = g.commit("y", &[base]);
        let m1 = g.commit("m1", &[x, y]);
        let m2 = g.commit("m2", &[y, x]);
        let tip1 = g.commit("tip1", &[m1]);
        let tip2 = g.commit("tip2", &[m2]);

        let mut bases = base_ids(&g, &tip1, &tip2);
        bases.sort();
        let mut expected = vec![x, y];
        expected.sort();
        assert_eq!(bases, expected);
    }

    #[test]
    fn unrelated_histories_have_no_base() {
        let g = TestGraph::new();
        let x1 = g.commit("x1", &[]);
        let x2 = g.commit("x2", &[x1]);
        let y1 = g.commit("y1", &[]);
        assert!(base_ids(&g, &x2, &y1).is_empty());
    }

    #[test]
    fn missing_parent_propagates() {
        let g = TestGraph::new();
        let ghost = Blob::new(b"gone".to_vec()).id();
        let broken = g.commit("broken", &[ghost]);
        let other = g.commit("other", &[]);

        let result = merge_base(&g.store, &g.node(&broken), &g.node(&other));
        assert!(matches!(result, Err(DagError::CommitNotFound(id)) if id == ghost));
    }
}
