//! Bit-parallel truth-table simulation.
//!
//! Up to 6 inputs pack into a single 64-bit word using the six canonical
//! base patterns (each bit position of the word is one full input
//! assignment). Beyond 6 inputs, multiple words are used: the low 6
//! variables keep the same per-word base pattern, and each additional
//! variable toggles entire words on or off.

use rustc_hash::FxHashMap;

use crate::graph::{Graph, Lit, NodeId};
use crate::window::Window;

/// Canonical single-word base patterns for the first 6 boolean variables.
pub const BASE_PATTERNS: [u64; 6] = [
    0xAAAA_AAAA_AAAA_AAAA,
    0xCCCC_CCCC_CCCC_CCCC,
    0xF0F0_F0F0_F0F0_F0F0,
    0xFF00_FF00_FF00_FF00,
    0xFFFF_0000_FFFF_0000,
    0xFFFF_FFFF_0000_0000,
];

/// Number of 64-bit words needed to represent all `2^n` assignments of
/// `n` boolean inputs.
#[must_use]
pub fn word_count(num_inputs: usize) -> usize {
    if num_inputs <= 6 {
        1
    } else {
        1usize << (num_inputs - 6)
    }
}

/// The bit pattern for input `index` (0-based) across `words` words of a
/// `num_inputs`-input truth table.
#[must_use]
pub fn input_pattern(index: usize, words: usize) -> Vec<u64> {
    if index < 6 {
        vec![BASE_PATTERNS[index]; words]
    } else {
        let shift = index - 6;
        (0..words)
            .map(|w| if (w >> shift) & 1 == 1 { u64::MAX } else { 0 })
            .collect()
    }
}

fn not_tt(a: &[u64]) -> Vec<u64> {
    a.iter().map(|w| !w).collect()
}

fn and_tt(a: &[u64], b: &[u64]) -> Vec<u64> {
    a.iter().zip(b).map(|(x, y)| x & y).collect()
}

/// Simulate an arbitrary set of literals over a graph given per-PI
/// patterns, returning one truth table per requested output literal.
///
/// `pi_patterns` must have one entry per primary input, in PI-index order
/// (PI `k` is `graph` variable `k + 1`), each with the same word count.
/// Used both to drive full-circuit equivalence checks and as the general
/// engine behind [`simulate_window`].
#[must_use]
pub fn simulate(graph: &Graph, pi_patterns: &[Vec<u64>], outputs: &[Lit]) -> Vec<Vec<u64>> {
    let words = pi_patterns.first().map_or(1, Vec::len);
    let mut tt: FxHashMap<NodeId, Vec<u64>> = FxHashMap::default();
    tt.insert(NodeId::CONST, vec![0u64; words]);
    for (i, pattern) in pi_patterns.iter().enumerate() {
        tt.insert(NodeId(i as u32 + 1), pattern.clone());
    }

    for id in graph.var_ids() {
        if tt.contains_key(&id) || graph.is_dead(id) || graph.is_pi(id) {
            continue;
        }
        let node = graph.node(id);
        let a = lit_tt(&tt, node.fanin0);
        let b = lit_tt(&tt, node.fanin1);
        tt.insert(id, and_tt(&a, &b));
    }

    outputs.iter().map(|&lit| lit_tt(&tt, lit)).collect()
}

fn lit_tt(tt: &FxHashMap<NodeId, Vec<u64>>, lit: Lit) -> Vec<u64> {
    let base = tt
        .get(&lit.var())
        .cloned()
        .unwrap_or_else(|| vec![0u64; 1]);
    if lit.is_inverted() {
        not_tt(&base)
    } else {
        base
    }
}

/// Truth tables for a window's target and every candidate divisor, over
/// the window's own input ordering.
#[derive(Debug, Clone)]
pub struct WindowSim {
    /// Number of window inputs (cut leaves).
    pub num_inputs: usize,
    /// Words per truth table.
    pub words: usize,
    /// Target node's truth table.
    pub target: Vec<u64>,
    /// One truth table per `window.divisors`, in the same order.
    pub divisors: Vec<Vec<u64>>,
}

/// Compute truth tables for every node needed to feasibility-check a
/// window: its divisors and its target, over the window's own inputs.
#[must_use]
pub fn simulate_window(graph: &Graph, window: &Window) -> WindowSim {
    let num_inputs = window.inputs.len();
    let words = word_count(num_inputs);
    let mut tt: FxHashMap<NodeId, Vec<u64>> = FxHashMap::default();
    tt.insert(NodeId::CONST, vec![0u64; words]);
    for (i, &input) in window.inputs.iter().enumerate() {
        tt.insert(input, input_pattern(i, words));
    }
    for &id in &window.nodes {
        if tt.contains_key(&id) {
            continue;
        }
        let node = graph.node(id);
        let a = lit_tt(&tt, node.fanin0);
        let b = lit_tt(&tt, node.fanin1);
        tt.insert(id, and_tt(&a, &b));
    }

    let target = tt
        .get(&window.target)
        .cloned()
        .unwrap_or_else(|| vec![0u64; words]);
    let divisors = window
        .divisors
        .iter()
        .map(|d| tt.get(d).cloned().unwrap_or_else(|| vec![0u64; words]))
        .collect();

    WindowSim {
        num_inputs,
        words,
        target,
        divisors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_patterns_enumerate_all_assignments_for_two_inputs() {
        let words = word_count(2);
        assert_eq!(words, 1);
        let a = input_pattern(0, words)[0];
        let b = input_pattern(1, words)[0];
        // AND(a,b) should have exactly one bit set per 4-row block pattern
        // matching row (1,1): canonical truth table of AND is 0x8 repeated.
        let and = a & b;
        assert_eq!(and & 0xF, 0x8);
    }

    #[test]
    fn multiword_pattern_toggles_whole_words_for_high_inputs() {
        let words = word_count(7);
        assert_eq!(words, 2);
        let p6 = input_pattern(6, words);
        assert_eq!(p6[0], 0);
        assert_eq!(p6[1], u64::MAX);
    }

    #[test]
    fn simulate_computes_and_gate_truth_table() {
        let mut g = Graph::new(2);
        let a = Lit::new(NodeId(1), false);
        let b = Lit::new(NodeId(2), false);
        let gate = g.create_and(a, b);
        let patterns = vec![input_pattern(0, 1), input_pattern(1, 1)];
        let out = simulate(&g, &patterns, &[gate]);
        assert_eq!(out[0][0] & 0xF, 0x8);
    }
}
