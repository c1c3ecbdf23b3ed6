//! Property tests: traversal results against brute-force reachability on
//! random histories.

use std::collections::{HashMap, HashSet};

use lineage_types::CommitId;
use proptest::prelude::*;
use proptest::sample::Index;

use crate::testutil::TestGraph;
use crate::{
    independents, is_ancestor, merge_base, CommitNode, FilterCommitIter, Never, VisitedSet,
};

struct History {
    graph: TestGraph,
    ids: Vec<CommitId>,
    index_of: HashMap<CommitId, usize>,
    parents: Vec<Vec<usize>>,
    /// `reach[i]` holds `i` and every ancestor of `i`.
    reach: Vec<HashSet<usize>>,
}

impl History {
    fn build(shape: &[Vec<Index>]) -> Self {
        let graph = TestGraph::new();
        let mut ids: Vec<CommitId> = Vec::new();
        let mut reach: Vec<HashSet<usize>> = Vec::new();
        let mut all_parents: Vec<Vec<usize>> = Vec::new();

        for (i, picks) in shape.iter().enumerate() {
            let mut parents: Vec<usize> = Vec::new();
            if i > 0 {
                for pick in picks {
                    let p = pick.index(i);
                    if !parents.contains(&p) {
                        parents.push(p);
                    }
                }
            }
            let parent_ids: Vec<CommitId> = parents.iter().map(|p| ids[*p]).collect();
            ids.push(graph.commit(&format!("commit {i}"), &parent_ids));

            let mut set: HashSet<usize> = HashSet::from([i]);
            for p in &parents {
                set.extend(reach[*p].iter().copied());
            }
            reach.push(set);
            all_parents.push(parents);
        }

        let index_of = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        Self {
            graph,
            ids,
            index_of,
            parents: all_parents,
            reach,
        }
    }

    fn node(&self, i: usize) -> CommitNode {
        self.graph.node(&self.ids[i])
    }

    fn indices(&self, nodes: &[CommitNode]) -> Vec<usize> {
        nodes.iter().map(|n| self.index_of[&n.id()]).collect()
    }

    /// Commits reachable from `start` along paths that avoid `blocked`.
    fn reach_avoiding(&self, start: usize, blocked: usize) -> HashSet<usize> {
        let mut seen = HashSet::new();
        let mut stack = vec![start];
        while let Some(i) = stack.pop() {
            if i == blocked || !seen.insert(i) {
                continue;
            }
            stack.extend(self.parents[i].iter().copied());
        }
        seen
    }

    /// Members of `set` not reachable from any other member.
    fn maximal(&self, set: &HashSet<usize>) -> HashSet<usize> {
        set.iter()
            .copied()
            .filter(|c| !set.iter().any(|d| d != c && self.reach[*d].contains(c)))
            .collect()
    }
}

fn shape() -> impl Strategy<Value = Vec<Vec<Index>>> {
    prop::collection::vec(prop::collection::vec(any::<Index>(), 0..3), 1..14)
}

proptest! {
    #[test]
    fn walk_emits_each_ancestor_once(shape in shape(), start in any::<Index>()) {
        let h = History::build(&shape);
        let s = start.index(h.ids.len());

        let emitted: Vec<usize> = FilterCommitIter::unfiltered(&h.graph.store, h.node(s))
            .map(|c| h.index_of[&c.unwrap().id()])
            .collect();
        let unique: HashSet<usize> = emitted.iter().copied().collect();
        prop_assert_eq!(unique.len(), emitted.len());
        prop_assert_eq!(unique, h.reach[s].clone());
    }

    #[test]
    fn seeded_commit_hides_history_only_reachable_through_it(
        shape in shape(),
        start in any::<Index>(),
        seeded in any::<Index>(),
    ) {
        let h = History::build(&shape);
        let s = start.index(h.ids.len());
        let z = seeded.index(h.ids.len());

        let walk = FilterCommitIter::new(
            &h.graph.store,
            h.node(s),
            VisitedSet::seeded([h.ids[z]]),
            Never,
            Never,
        );
        let emitted: Vec<usize> = walk.map(|c| h.index_of[&c.unwrap().id()]).collect();
        let unique: HashSet<usize> = emitted.iter().copied().collect();
        prop_assert_eq!(unique.len(), emitted.len());
        prop_assert!(!unique.contains(&z));
        prop_assert_eq!(unique, h.reach_avoiding(s, z));
    }

    #[test]
    fn seeded_start_emits_nothing(shape in shape(), start in any::<Index>()) {
        let h = History::build(&shape);
        let s = start.index(h.ids.len());
        let walk = FilterCommitIter::new(
            &h.graph.store,
            h.node(s),
            VisitedSet::seeded([h.ids[s]]),
            Never,
            Never,
        );
        prop_assert_eq!(walk.count(), 0);
    }

    #[test]
    fn is_ancestor_matches_reachability(
        shape in shape(),
        x in any::<Index>(),
        y in any::<Index>(),
    ) {
        let h = History::build(&shape);
        let (x, y) = (x.index(h.ids.len()), y.index(h.ids.len()));

        let got = is_ancestor(&h.graph.store, &h.node(x), &h.node(y)).unwrap();
        prop_assert_eq!(got, h.reach[y].contains(&x));
    }

    #[test]
    fn merge_base_is_maximal_common_ancestors(
        shape in shape(),
        x in any::<Index>(),
        y in any::<Index>(),
    ) {
        let h = History::build(&shape);
        let (x, y) = (x.index(h.ids.len()), y.index(h.ids.len()));

        let bases = merge_base(&h.graph.store, &h.node(x), &h.node(y)).unwrap();
        let got: Vec<usize> = h.indices(&bases);
        let got_set: HashSet<usize> = got.iter().copied().collect();
        prop_assert_eq!(got_set.len(), got.len());

        let common: HashSet<usize> = h.reach[x].intersection(&h.reach[y]).copied().collect();
        prop_assert_eq!(got_set, h.maximal(&common));
    }

    #[test]
    fn independents_keeps_only_unreachable_members(
        shape in shape(),
        picks in prop::collection::vec(any::<Index>(), 0..6),
    ) {
        let h = History::build(&shape);
        let chosen: Vec<usize> = picks.iter().map(|p| p.index(h.ids.len())).collect();
        let nodes: Vec<CommitNode> = chosen.iter().map(|i| h.node(*i)).collect();

        let got = h.indices(&independents(&h.graph.store, &nodes).unwrap());
        let distinct: HashSet<usize> = chosen.iter().copied().collect();
        let expected = h.maximal(&distinct);
        prop_assert_eq!(got.iter().copied().collect::<HashSet<_>>(), expected);

        // Survivors appear in first-occurrence order.
        let mut order: Vec<usize> = Vec::new();
        for i in &chosen {
            if got.contains(i) && !order.contains(i) {
                order.push(*i);
            }
        }
        prop_assert_eq!(got, order);
    }
}
