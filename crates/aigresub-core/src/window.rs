//! Window extraction: for every non-trivial cut in the graph, the region
//! between the cut's leaves and its target node, together with the
//! divisor set available for resubstituting that target.
//!
//! Extracting windows cut-by-cut (backward DFS from each target down to
//! its cut's leaves) costs `O(cuts x nodes)`. Instead every cut is
//! propagated in a single topological sweep: each cut is a labeled token,
//! and a gate's token set is the intersection of its two fanins' token
//! sets (a gate lies above a cut iff both fanins do), unioned with the
//! tokens it seeds itself as a leaf. A node's final token set names every
//! cut whose window it falls inside.

use rustc_hash::FxHashSet;

use crate::cut::CutEnumerator;
use crate::graph::{Graph, NodeId};
use crate::mffc::{compute_mffc_excluding, compute_tfo, DerefState};

/// A resubstitution window: the region of the graph between a cut's leaves
/// and its target node, plus the divisor nodes available to rewrite the
/// target.
#[derive(Debug, Clone)]
pub struct Window {
    /// The node being considered for resubstitution.
    pub target: NodeId,
    /// Cut leaves bounding the window (its primary inputs, for simulation
    /// purposes).
    pub inputs: Vec<NodeId>,
    /// All internal nodes between `inputs` and `target`, inclusive of
    /// `target`, exclusive of `inputs` themselves.
    pub nodes: Vec<NodeId>,
    /// Divisor candidates: window-internal nodes that are neither in the
    /// target's MFFC (would be removed if the target is rewritten) nor in
    /// the target's transitive fanout (would create a combinational cycle
    /// if used as a divisor).
    pub divisors: Vec<NodeId>,
    /// `mffc_size`: the upper bound on the gate-count gain a rewrite of
    /// this window could achieve.
    pub mffc_size: usize,
}

/// Intersect two sorted, deduplicated slices.
fn sorted_intersect(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

fn sorted_union_inplace(into: &mut Vec<u32>, other: &[u32]) {
    if other.is_empty() {
        return;
    }
    let mut merged = Vec::with_capacity(into.len() + other.len());
    let (mut i, mut j) = (0, 0);
    while i < into.len() && j < other.len() {
        if into[i] < other[j] {
            merged.push(into[i]);
            i += 1;
        } else if into[i] > other[j] {
            merged.push(other[j]);
            j += 1;
        } else {
            merged.push(into[i]);
            i += 1;
            j += 1;
        }
    }
    merged.extend_from_slice(&into[i..]);
    merged.extend_from_slice(&other[j..]);
    *into = merged;
}

/// Extracts windows for every non-trivial cut in a graph, driven by a
/// [`CutEnumerator`].
pub struct WindowExtractor {
    max_cut_size: usize,
}

impl WindowExtractor {
    /// Create an extractor that enumerates cuts up to `max_cut_size` leaves.
    #[must_use]
    pub fn new(max_cut_size: usize) -> Self {
        WindowExtractor { max_cut_size }
    }

    /// Extract one window per non-trivial cut found in the graph, by
    /// propagating every cut's membership token through a single
    /// topological sweep rather than re-walking the graph per cut.
    pub fn extract_all_windows(&self, graph: &Graph) -> Vec<Window> {
        let mut enumerator = CutEnumerator::new(self.max_cut_size);
        enumerator.enumerate_cuts(graph);

        // Step 1: flatten every non-trivial cut into a single array,
        // indexed by cut_id, recording which node it targets.
        let mut cut_targets: Vec<NodeId> = Vec::new();
        let mut cut_leaves: Vec<Vec<NodeId>> = Vec::new();
        for id in graph.var_ids() {
            if graph.is_pi(id) || graph.is_dead(id) {
                continue;
            }
            for cut in enumerator.get_cuts(id) {
                if cut.leaves.len() <= 1 {
                    continue;
                }
                cut_targets.push(id);
                cut_leaves.push(cut.leaves.clone());
            }
        }

        // Step 2: seed each leaf's token set with the cuts it bounds.
        let num_vars = graph.num_vars();
        let mut tokens: Vec<Vec<u32>> = vec![Vec::new(); num_vars];
        for (cut_id, leaves) in cut_leaves.iter().enumerate() {
            for &leaf in leaves {
                tokens[leaf.0 as usize].push(cut_id as u32);
            }
        }
        for t in &mut tokens {
            t.sort_unstable();
        }

        // Step 3: propagate upward. A gate lies above a cut iff both its
        // fanins do, so its token set gains the intersection of its
        // fanins' token sets (on top of whatever it already seeded as a
        // leaf of some other cut).
        for id in graph.var_ids() {
            if graph.is_pi(id) || graph.is_dead(id) {
                continue;
            }
            let node = graph.node(id);
            let a = node.fanin0.var();
            let b = node.fanin1.var();
            let merged = sorted_intersect(&tokens[a.0 as usize], &tokens[b.0 as usize]);
            sorted_union_inplace(&mut tokens[id.0 as usize], &merged);
        }

        // Step 4: invert tokens -> nodes_of_cut. A node v belongs to cut
        // c's window body iff c is in tokens(v).
        let mut nodes_of_cut: Vec<Vec<NodeId>> = vec![Vec::new(); cut_targets.len()];
        for id in graph.var_ids() {
            if graph.is_dead(id) {
                continue;
            }
            for &cut_id in &tokens[id.0 as usize] {
                nodes_of_cut[cut_id as usize].push(id);
            }
        }

        let mut state = DerefState::new(graph);
        let mut windows = Vec::with_capacity(cut_targets.len());
        for cut_id in 0..cut_targets.len() {
            let target = cut_targets[cut_id];
            let leaves = &cut_leaves[cut_id];
            let mut nodes = nodes_of_cut[cut_id].clone();
            nodes.sort_unstable();
            if let Some(window) = self.build_window(graph, target, leaves, nodes, &mut state) {
                windows.push(window);
            }
        }
        windows
    }

    fn build_window(
        &self,
        graph: &Graph,
        target: NodeId,
        leaves: &[NodeId],
        nodes: Vec<NodeId>,
        state: &mut DerefState,
    ) -> Option<Window> {
        if !nodes.contains(&target) {
            return None;
        }

        let mffc = compute_mffc_excluding(graph, target, &[], state);
        let mffc_size = mffc.len();
        let mffc_set: FxHashSet<NodeId> = mffc.into_iter().collect();
        let window_set: FxHashSet<NodeId> = nodes.iter().copied().collect();
        let tfo = compute_tfo(graph, target, &window_set);

        let mut divisors: Vec<NodeId> = nodes
            .iter()
            .copied()
            .filter(|n| *n != target && !mffc_set.contains(n) && !tfo.contains(n))
            .collect();
        divisors.sort_unstable();

        let mut inputs: Vec<NodeId> = leaves.to_vec();
        inputs.sort_unstable();

        Some(Window {
            target,
            inputs,
            nodes,
            divisors,
            mffc_size,
        })
    }
}
