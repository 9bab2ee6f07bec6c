//! Exact-synthesis adapter: converts a window's simulated truth tables into
//! the `(binary relation, simulation matrix)` wire format and hands them to
//! a pluggable [`Synthesizer`] backend.
//!
//! The core treats synthesis as an external collaborator (spec: "a
//! black box that takes a binary relation plus a divisor simulation matrix
//! and returns a minimum-gate AIG or none"). [`Synthesizer`] is that
//! boundary; [`BruteForceSynthesizer`] is a real, if unsophisticated,
//! implementation suitable for the small gate bounds this crate calls it
//! with (`max_gates` is 4-6 in practice), leaving room for a SAT-backed
//! implementation to be swapped in later via the same trait.

use crate::graph::{Lit, NodeId};
use crate::sim::{input_pattern, word_count, WindowSim};
use crate::window::Window;

/// One row of the target's binary relation: `[off_bit, on_bit]`. Exactly
/// one of the two is set (no don't-cares in this version).
pub type Row = [bool; 2];

/// The target function as a binary relation, one row per window-input
/// pattern (`rows.len()` is always a power of two).
#[derive(Debug, Clone)]
pub struct BinaryRelation {
    rows: Vec<Row>,
}

impl BinaryRelation {
    /// Number of window inputs this relation was built over
    /// (`rows.len() == 2^num_inputs`).
    #[must_use]
    pub fn num_inputs(&self) -> usize {
        self.rows.len().trailing_zeros() as usize
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

/// The selected divisors' simulated values, one row per window-input
/// pattern, one column per divisor not already among the window's inputs.
#[derive(Debug, Clone)]
pub struct SimMatrix {
    rows: Vec<Vec<bool>>,
}

impl SimMatrix {
    /// Number of extra-divisor columns.
    #[must_use]
    pub fn num_divisors(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }
}

/// A miniature AIG produced by exact synthesis, ready to be spliced into a
/// host graph. Variable numbering is local to this structure: `0` is the
/// constant, `1..=num_pis` are inputs, and gates follow at
/// `num_pis+1..`.
#[derive(Debug, Clone)]
pub struct SubAig {
    /// Declared input count: `window.inputs.len() + |extra selected divisors|`.
    pub num_pis: usize,
    /// Gate fanins in creation order; gate `i`'s variable is `num_pis + 1 + i`.
    pub gates: Vec<(Lit, Lit)>,
    /// The single primary output literal, referencing the last gate (or,
    /// for a zero-gate circuit, directly an input or the constant).
    pub po: Lit,
}

impl SubAig {
    /// Total variable count, including the constant and the PIs.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        1 + self.num_pis + self.gates.len()
    }
}

/// The external exact-synthesis boundary. A caller provides the target's
/// binary relation, the simulation matrix of divisors available as extra
/// inputs, and a gate budget; the synthesizer returns a minimum-gate
/// [`SubAig`] implementing the relation, or `None` if no such circuit
/// exists within the budget.
pub trait Synthesizer {
    /// Attempt synthesis. `max_gates` bounds the search; a `None` result
    /// means "no candidate within budget", not an error.
    fn synthesize(&self, br: &BinaryRelation, sim: &SimMatrix, max_gates: usize) -> Option<SubAig>;
}

/// A brute-force/backtracking exact synthesizer: tries every legal
/// two-input-gate AIG in increasing gate-count order (then a fixed
/// lexicographic operand order within a count), returning the first whose
/// truth table matches the target relation on every row.
///
/// Gate count is bounded in practice by the caller (4-6), so the search
/// space stays small enough to enumerate exhaustively; this is not a
/// general-purpose synthesis engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceSynthesizer;

impl BruteForceSynthesizer {
    /// Convenience entry point for a relation with no extra divisor
    /// columns (`sim` is empty): the `br`-only form mentioned as optional
    /// in the core contract.
    #[must_use]
    pub fn synthesize_br_only(&self, br: &BinaryRelation, max_gates: usize) -> Option<SubAig> {
        let empty = SimMatrix {
            rows: vec![Vec::new(); br.rows.len()],
        };
        self.synthesize(br, &empty, max_gates)
    }
}

struct Signal {
    var: NodeId,
    tt: Vec<u64>,
}

fn and_words(a: &[u64], inv_a: bool, b: &[u64], inv_b: bool) -> Vec<u64> {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let x = if inv_a { !x } else { x };
            let y = if inv_b { !y } else { y };
            x & y
        })
        .collect()
}

fn matches_target(tt: &[u64], target: &[u64]) -> Option<bool> {
    if tt == target {
        return Some(false);
    }
    let inv: Vec<u64> = tt.iter().map(|w| !w).collect();
    if inv == target {
        return Some(true);
    }
    None
}

fn try_depth(
    signals: &mut Vec<Signal>,
    gates: &mut Vec<(Lit, Lit)>,
    remaining: usize,
    num_pis: usize,
    target: &[u64],
) -> Option<SubAig> {
    if remaining == 0 {
        for s in signals.iter() {
            if let Some(inverted) = matches_target(&s.tt, target) {
                return Some(SubAig {
                    num_pis,
                    gates: gates.clone(),
                    po: Lit::new(s.var, inverted),
                });
            }
        }
        return None;
    }

    let n = signals.len();
    for i in 0..n {
        for j in i..n {
            for inv_a in [false, true] {
                for inv_b in [false, true] {
                    if i == j && inv_a != inv_b {
                        continue; // x & !x is a constant, never useful mid-search
                    }
                    if i == j && inv_a == inv_b {
                        continue; // x & x adds no information
                    }
                    let tt = and_words(&signals[i].tt, inv_a, &signals[j].tt, inv_b);
                    let new_var = NodeId((1 + num_pis + gates.len()) as u32);
                    let a_lit = Lit::new(signals[i].var, inv_a);
                    let b_lit = Lit::new(signals[j].var, inv_b);
                    let (a_lit, b_lit) = if a_lit.0 <= b_lit.0 {
                        (a_lit, b_lit)
                    } else {
                        (b_lit, a_lit)
                    };
                    gates.push((a_lit, b_lit));
                    signals.push(Signal { var: new_var, tt });
                    if let Some(found) =
                        try_depth(signals, gates, remaining - 1, num_pis, target)
                    {
                        return Some(found);
                    }
                    signals.pop();
                    gates.pop();
                }
            }
        }
    }
    None
}

impl Synthesizer for BruteForceSynthesizer {
    fn synthesize(&self, br: &BinaryRelation, sim: &SimMatrix, max_gates: usize) -> Option<SubAig> {
        let num_inputs = br.num_inputs();
        let num_rows = br.rows.len();
        let num_divisors = sim.num_divisors();
        let num_pis = num_inputs + num_divisors;
        let words = word_count(num_inputs);

        // Pack each row-indexed boolean into a `words`-word vector, tiling
        // the row pattern across the full word width when `num_rows < 64`
        // so it stays period-consistent with `input_pattern`'s base
        // patterns (AND of periodic patterns is itself periodic; a
        // zero-padded tail would break that and make otherwise-equal
        // truth tables compare unequal).
        let pack = |bit_of: &dyn Fn(usize) -> bool| -> Vec<u64> {
            let mut out = vec![0u64; words];
            for full_bit in 0..words * 64 {
                if bit_of(full_bit % num_rows) {
                    out[full_bit / 64] |= 1u64 << (full_bit % 64);
                }
            }
            out
        };

        let target = pack(&|p| br.rows[p][1]);

        let mut signals = Vec::with_capacity(1 + num_pis);
        signals.push(Signal {
            var: NodeId::CONST,
            tt: vec![0u64; words],
        });
        for i in 0..num_inputs {
            let pat = input_pattern(i, words);
            signals.push(Signal {
                var: NodeId((i + 1) as u32),
                tt: pat,
            });
        }
        for d in 0..num_divisors {
            let tt = pack(&|p| sim.rows[p][d]);
            signals.push(Signal {
                var: NodeId((num_inputs + d + 1) as u32),
                tt,
            });
        }

        let mut gates = Vec::new();
        for budget in 0..=max_gates {
            if let Some(found) = try_depth(&mut signals, &mut gates, budget, num_pis, &target) {
                return Some(found);
            }
        }
        None
    }
}

/// Build the `(br, sim)` pair for a window's target and a selected subset
/// of its divisors, filtering out divisors already present among the
/// window's inputs (they need no extra column). Returns the relation, the
/// matrix, and the ordered list of extra divisor node ids the matrix's
/// columns correspond to (`S` in the spec).
#[must_use]
pub fn prepare_relation(
    window: &Window,
    wsim: &WindowSim,
    selected: &[usize],
) -> (BinaryRelation, SimMatrix, Vec<NodeId>) {
    let num_inputs = wsim.num_inputs;
    let num_rows = 1usize << num_inputs;

    let extra: Vec<usize> = selected
        .iter()
        .copied()
        .filter(|&idx| !window.inputs.contains(&window.divisors[idx]))
        .collect();
    let extra_ids: Vec<NodeId> = extra.iter().map(|&idx| window.divisors[idx]).collect();

    let bit = |tt: &[u64], p: usize| -> bool { (tt[p / 64] >> (p % 64)) & 1 == 1 };

    let mut rows = Vec::with_capacity(num_rows);
    for p in 0..num_rows {
        let on = bit(&wsim.target, p);
        rows.push([!on, on]);
    }

    let mut sim_rows = vec![Vec::with_capacity(extra.len()); num_rows];
    for &idx in &extra {
        let tt = &wsim.divisors[idx];
        for p in 0..num_rows {
            sim_rows[p].push(bit(tt, p));
        }
    }

    (BinaryRelation { rows }, SimMatrix { rows: sim_rows }, extra_ids)
}
