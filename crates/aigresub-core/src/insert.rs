//! The gain-ordered inserter: collects synthesized rewrite candidates from
//! every window, then applies them highest-gain-first, revalidating each
//! against the graph's current (possibly already-mutated) state before
//! splicing it in.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::feasibility;
use crate::graph::{Graph, NodeId};
use crate::sim::{simulate_window, WindowSim};
use crate::splice::splice;
use crate::stats::Stats;
use crate::synth::{prepare_relation, Synthesizer};
use crate::window::Window;

/// A synthesized rewrite, ready to be spliced in if it survives
/// revalidation at the time it is popped from the heap.
pub struct Candidate {
    /// The node this candidate would replace.
    pub target: NodeId,
    /// Ordered host variables the synthesized circuit's inputs map to:
    /// `window.inputs ++ extra selected divisors`.
    pub host_inputs: Vec<NodeId>,
    /// The synthesized replacement.
    pub sub: crate::synth::SubAig,
    /// `mffc_size(window) - gates(sub)`; the heap key.
    pub gain: i64,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.gain == other.gain
    }
}
impl Eq for Candidate {}
impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.gain.cmp(&other.gain)
    }
}

/// Divisor index subsets worth testing for a window, in increasing-`k`
/// order (so fewer-input solutions — smaller `SubAig`s — are tried
/// first), per the small-`k` enumerators spec.md documents alongside
/// `find_feasible_4`.
fn feasible_subsets(wsim: &WindowSim) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if feasibility::feasible_k0(&wsim.target).is_some() {
        out.push(Vec::new());
    }
    for (i, d) in wsim.divisors.iter().enumerate() {
        if feasibility::feasible_k1(d, &wsim.target).is_some() {
            out.push(vec![i]);
        }
    }
    let n = wsim.divisors.len();
    for i in 0..n {
        for j in (i + 1)..n {
            if feasibility::feasible_k(&[&wsim.divisors[i], &wsim.divisors[j]], &wsim.target) {
                out.push(vec![i, j]);
            }
        }
    }
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                if feasibility::feasible_k(
                    &[&wsim.divisors[i], &wsim.divisors[j], &wsim.divisors[k]],
                    &wsim.target,
                ) {
                    out.push(vec![i, j, k]);
                }
            }
        }
    }
    for tuple in feasibility::find_feasible_4(&wsim.divisors, &wsim.target) {
        out.push(tuple.to_vec());
    }
    out
}

/// Run feasibility and synthesis over every window, returning every
/// candidate rewrite with positive gain. Uses the graph's state at call
/// time; the caller is expected to do this once before any splicing
/// begins (candidates are revalidated against later mutations by
/// [`apply_candidates`], not regenerated).
pub fn generate_candidates<S: Synthesizer>(
    graph: &Graph,
    windows: &[Window],
    synthesizer: &S,
    max_gates: usize,
) -> (Vec<Candidate>, usize) {
    let mut candidates = Vec::new();
    let mut synthesized = 0;
    for window in windows {
        let wsim = simulate_window(graph, window);
        for subset in feasible_subsets(&wsim) {
            let (br, sim, extra_ids) = prepare_relation(window, &wsim, &subset);
            let Some(sub) = synthesizer.synthesize(&br, &sim, max_gates) else {
                continue;
            };
            synthesized += 1;
            let gain = window.mffc_size as i64 - sub.gates.len() as i64;
            if gain <= 0 {
                continue;
            }
            let mut host_inputs = window.inputs.clone();
            host_inputs.extend(extra_ids);
            candidates.push(Candidate {
                target: window.target,
                host_inputs,
                sub,
                gain,
            });
        }
    }
    (candidates, synthesized)
}

/// A candidate is still safe to apply iff its target and every host input
/// are still live, and `target` is not in the transitive fanin of any
/// selected host input (an earlier splice could have routed a
/// once-independent divisor downstream of `target`, which would make
/// using it as an input a combinational cycle).
fn revalidate(graph: &Graph, candidate: &Candidate) -> bool {
    if graph.is_dead(candidate.target) {
        return false;
    }
    if candidate.host_inputs.iter().any(|&i| graph.is_dead(i)) {
        return false;
    }
    !graph.reaches(&candidate.host_inputs, candidate.target)
}

/// Apply candidates highest-gain-first, discarding any that fail
/// revalidation, and return updated run statistics.
pub fn apply_candidates(graph: &mut Graph, candidates: Vec<Candidate>, stats: &mut Stats) {
    let mut heap: BinaryHeap<Candidate> = candidates.into_iter().collect();
    while let Some(candidate) = heap.pop() {
        if !revalidate(graph, &candidate) {
            stats.candidates_rejected += 1;
            debug!(target = candidate.target.0, gain = candidate.gain, "candidate rejected on revalidation");
            continue;
        }
        debug!(target = candidate.target.0, gain = candidate.gain, "applying candidate");
        splice(graph, candidate.target, &candidate.host_inputs, &candidate.sub)
            .expect("revalidated candidate must splice cleanly");
        stats.candidates_applied += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Lit;
    use crate::synth::BruteForceSynthesizer;
    use crate::window::WindowExtractor;

    #[test]
    fn heap_prefers_higher_gain_candidate_and_invalidates_the_loser() {
        // Two candidates overlapping on the same target: one with gain 3,
        // one with gain 1. Build a graph where the same node is the
        // target of two different-sized MFFCs is awkward to construct
        // directly, so instead assert the ordering property on the heap
        // itself plus end-to-end behavior on a real window.
        let mut g = Graph::new(4);
        let l = |i: u32| Lit::new(NodeId(i), false);
        let g5 = g.create_and(l(1), l(2));
        let g6 = g.create_and(l(3), l(4));
        let target = g.create_and(g5, g6);
        g.add_output(target);

        let extractor = WindowExtractor::new(4);
        let windows = extractor.extract_all_windows(&g);
        let synth = BruteForceSynthesizer;
        let (candidates, synthesized) = generate_candidates(&g, &windows, &synth, 4);
        assert!(synthesized > 0);
        assert!(candidates.iter().any(|c| c.target == target.var()));

        let mut stats = Stats::default();
        stats.initial_gates = g.num_gates();
        apply_candidates(&mut g, candidates, &mut stats);
        assert!(stats.candidates_applied >= 1);
        assert!(g.num_gates() < stats.initial_gates);
    }

    #[test]
    fn candidate_ordering_is_gain_descending() {
        let lo = Candidate {
            target: NodeId(1),
            host_inputs: vec![],
            sub: crate::synth::SubAig {
                num_pis: 0,
                gates: vec![],
                po: Lit::FALSE,
            },
            gain: 1,
        };
        let hi = Candidate {
            target: NodeId(2),
            host_inputs: vec![],
            sub: crate::synth::SubAig {
                num_pis: 0,
                gates: vec![],
                po: Lit::FALSE,
            },
            gain: 3,
        };
        assert!(hi > lo);
        let mut heap = BinaryHeap::new();
        heap.push(lo);
        heap.push(hi);
        assert_eq!(heap.pop().unwrap().gain, 3);
    }
}
