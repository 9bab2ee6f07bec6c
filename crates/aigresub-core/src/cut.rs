//! K-feasible cut enumeration with signature-based dominance pruning.

use rustc_hash::FxHashMap;

use crate::graph::{Graph, NodeId};

/// A K-feasible cut: the set of leaves whose transitive fanin covers a
/// particular node, bounded in size by the enumerator's `max_cut_size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cut {
    /// Leaf node ids, always kept sorted for stable dominance comparison.
    pub leaves: Vec<NodeId>,
    /// 64-bit signature: bit `i` set iff some leaf has `id % 64 == i`.
    /// A cheap necessary (not sufficient) pre-check for set containment.
    pub signature: u64,
}

impl Cut {
    fn trivial(node: NodeId) -> Self {
        Cut {
            leaves: vec![node],
            signature: 1u64 << (node.0 as u64 % 64),
        }
    }

    fn merge(a: &Cut, b: &Cut, limit: usize) -> Option<Cut> {
        let mut leaves = a.leaves.clone();
        for &l in &b.leaves {
            if !leaves.contains(&l) {
                leaves.push(l);
            }
        }
        if leaves.len() > limit {
            return None;
        }
        leaves.sort_unstable();
        Some(Cut {
            signature: a.signature | b.signature,
            leaves,
        })
    }

    /// Whether `self` dominates (is a subset of, and therefore renders
    /// redundant) `other`.
    fn dominates(&self, other: &Cut) -> bool {
        if self.leaves.len() > other.leaves.len() {
            return false;
        }
        // Signature mismatch is a cheap proof of non-containment.
        if self.signature & !other.signature != 0 {
            return false;
        }
        self.leaves.iter().all(|l| other.leaves.contains(l))
    }
}

/// Enumerates K-feasible cuts for every node in a graph.
pub struct CutEnumerator {
    max_cut_size: usize,
    cuts: FxHashMap<NodeId, Vec<Cut>>,
}

impl CutEnumerator {
    /// Create an enumerator bounded to cuts of at most `max_cut_size`
    /// leaves. Valid range is `1..=20`; values outside that range are
    /// clamped, matching this module's documented K-feasibility bound.
    #[must_use]
    pub fn new(max_cut_size: usize) -> Self {
        CutEnumerator {
            max_cut_size: max_cut_size.clamp(1, 20),
            cuts: FxHashMap::default(),
        }
    }

    /// Compute cuts for every node in the graph, in topological order.
    pub fn enumerate_cuts(&mut self, graph: &Graph) {
        self.cuts.clear();
        for id in graph.var_ids() {
            let node = graph.node(id);
            if node.is_dead {
                continue;
            }
            if node.is_pi {
                self.cuts.insert(id, vec![Cut::trivial(id)]);
                continue;
            }
            let left = self.cuts.get(&node.fanin0.var()).cloned().unwrap_or_else(
                || vec![Cut::trivial(node.fanin0.var())],
            );
            let right = self.cuts.get(&node.fanin1.var()).cloned().unwrap_or_else(
                || vec![Cut::trivial(node.fanin1.var())],
            );
            let mut merged = Vec::new();
            for a in &left {
                for b in &right {
                    if let Some(c) = Cut::merge(a, b, self.max_cut_size) {
                        merged.push(c);
                    }
                }
            }
            merged.push(Cut::trivial(id));
            self.cuts.insert(id, Self::prune_dominated(merged));
        }
    }

    fn prune_dominated(mut cuts: Vec<Cut>) -> Vec<Cut> {
        cuts.sort_by_key(|c| c.leaves.len());
        let mut kept: Vec<Cut> = Vec::with_capacity(cuts.len());
        for cut in cuts {
            if kept.iter().any(|k| k.dominates(&cut)) {
                continue;
            }
            kept.retain(|k| !cut.dominates(k));
            kept.push(cut);
        }
        kept
    }

    /// The cuts computed for `node`, or an empty slice if
    /// [`CutEnumerator::enumerate_cuts`] has not yet been run or the node
    /// is dead.
    #[must_use]
    pub fn get_cuts(&self, node: NodeId) -> &[Cut] {
        self.cuts.get(&node).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Lit;

    fn chain_graph() -> Graph {
        // PIs 1,2,3,4; gate5 = 1&2; gate6 = gate5&3; gate7 = gate6&4
        let mut g = Graph::new(4);
        let l = |i: u32| Lit::new(NodeId(i), false);
        let g5 = g.create_and(l(1), l(2));
        let g6 = g.create_and(g5, l(3));
        let g7 = g.create_and(g6, l(4));
        g.add_output(g7);
        g
    }

    #[test]
    fn trivial_cut_included_for_every_node() {
        let g = chain_graph();
        let mut ce = CutEnumerator::new(4);
        ce.enumerate_cuts(&g);
        for id in g.var_ids() {
            if g.is_dead(id) {
                continue;
            }
            let cuts = ce.get_cuts(id);
            assert!(cuts.iter().any(|c| c.leaves == vec![id]));
        }
    }

    #[test]
    fn cuts_respect_size_bound() {
        let g = chain_graph();
        let mut ce = CutEnumerator::new(2);
        ce.enumerate_cuts(&g);
        for id in g.var_ids() {
            for c in ce.get_cuts(id) {
                assert!(c.leaves.len() <= 2);
            }
        }
    }

    #[test]
    fn dominance_pruning_keeps_minimal_cuts() {
        let g = chain_graph();
        let mut ce = CutEnumerator::new(4);
        ce.enumerate_cuts(&g);
        // The root's own singleton cut dominates nothing smaller, but a
        // cut equal to a subset of another must have eliminated the
        // superset duplicate.
        let cuts = ce.get_cuts(NodeId(5));
        let mut seen = std::collections::HashSet::new();
        for c in cuts {
            assert!(seen.insert(c.leaves.clone()), "duplicate cut retained");
        }
    }
}
