//! And-inverter graph data model and resubstitution optimizer.
//!
//! This crate implements a full AIG resubstitution rewrite loop: load a
//! combinational AIG, enumerate local windows around every gate, test each
//! window's target for 4-feasibility against its divisors, synthesize a
//! minimum-gate replacement where feasible, and splice the best
//! non-conflicting rewrites back into the graph. [`aigresub-cli`](../aigresub_cli)
//! is the thin binary wrapper around [`run`].
//!
//! # Overview
//!
//! The graph uses a flat, arena-indexed representation ([`Graph`]) rather
//! than a general-purpose graph library: AIG nodes need dense O(1) indexing
//! by small monotonically increasing ids plus custom invariant bookkeeping
//! that a generic graph type does not give for free.
//!
//! # Core Components
//!
//! - **Graph model**: [`Graph`], [`Node`], [`Lit`], [`NodeId`] — the AIG
//!   itself, with canonical fanin ordering and dead-node retention.
//! - **Cuts**: [`CutEnumerator`], [`Cut`] — K-feasible cut enumeration with
//!   signature-based dominance pruning.
//! - **MFFC/TFO**: [`mffc::compute_mffc`], [`mffc::compute_tfo`] — maximum
//!   fanout-free cone and transitive fanout, via a dereference-counter walk.
//! - **Windows**: [`WindowExtractor`], [`Window`] — the resubstitution
//!   region around a target node and its divisor candidates, extracted by
//!   propagating every cut simultaneously in one topological sweep.
//! - **Simulation**: [`sim::simulate`], [`sim::simulate_window`] — bit-
//!   parallel truth-table evaluation.
//! - **Feasibility**: [`feasibility::find_feasible_4`] — exhaustive
//!   4-divisor resubstitution search via bit-parallel group accumulators.
//! - **Synthesis**: [`synth::Synthesizer`], [`synth::BruteForceSynthesizer`]
//!   — the exact-synthesis boundary and a working default backend.
//! - **Inserter**: [`insert::generate_candidates`], [`insert::apply_candidates`]
//!   — gain-ordered candidate collection and revalidated splicing.
//! - **Splice**: [`splice::splice`] — importing a [`synth::SubAig`] in
//!   place of its target.
//! - **AIGER codec**: [`aiger::read_aiger`], [`aiger::write_ascii`],
//!   [`aiger::write_binary`].
//!
//! # Example: building a small graph and reading it back
//!
//! ```rust
//! use aigresub_core::graph::{Graph, Lit, NodeId};
//! use aigresub_core::aiger;
//!
//! let mut g = Graph::new(2);
//! let a = Lit::new(NodeId(1), false);
//! let b = Lit::new(NodeId(2), false);
//! let and_ab = g.create_and(a, b);
//! g.add_output(and_ab);
//!
//! let text = aiger::write_ascii(&g);
//! let parsed = aiger::read_aiger(text.as_bytes()).unwrap();
//! assert_eq!(parsed.num_gates(), 1);
//! ```

pub mod aiger;
pub mod cut;
pub mod error;
pub mod feasibility;
pub mod graph;
pub mod insert;
pub mod mffc;
pub mod sim;
pub mod splice;
pub mod stats;
pub mod synth;
pub mod window;

pub use cut::{Cut, CutEnumerator};
pub use error::{AigError, AigResult};
pub use graph::{Graph, Lit, Node, NodeId};
pub use stats::Stats;
pub use synth::{BruteForceSynthesizer, SubAig, Synthesizer};
pub use window::{Window, WindowExtractor};

use tracing::info;

/// Run one full resubstitution pass over `graph`: enumerate windows,
/// collect gain-ordered rewrite candidates, and apply the ones that
/// survive revalidation. Returns the run's [`Stats`].
///
/// This is the single entry point [`aigresub-cli`](../aigresub_cli) drives;
/// library callers that want finer control (e.g. running several passes,
/// or swapping the synthesis backend) can call [`WindowExtractor`],
/// [`insert::generate_candidates`] and [`insert::apply_candidates`]
/// directly instead.
pub fn run<S: Synthesizer>(graph: &mut Graph, max_cut_size: usize, synthesizer: &S, max_gates: usize) -> Stats {
    let start = std::time::Instant::now();
    let mut stats = Stats {
        initial_gates: graph.num_gates(),
        ..Stats::default()
    };

    let extractor = WindowExtractor::new(max_cut_size);
    let windows = extractor.extract_all_windows(graph);
    stats.windows_extracted = windows.len();
    info!(gates = stats.initial_gates, windows = windows.len(), "extracted windows");

    let (candidates, synthesized) = insert::generate_candidates(graph, &windows, synthesizer, max_gates);
    stats.candidates_synthesized = synthesized;
    info!(candidates = candidates.len(), synthesized, "generated rewrite candidates");

    insert::apply_candidates(graph, candidates, &mut stats);
    stats.final_gates = graph.num_gates();
    stats.wall_time = start.elapsed();
    info!(
        applied = stats.candidates_applied,
        rejected = stats.candidates_rejected,
        final_gates = stats.final_gates,
        wall_time = ?stats.wall_time,
        "inserter pass complete"
    );

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph::Lit;

    #[test]
    fn run_reduces_gate_count_on_a_resubstitutable_graph() {
        let mut g = Graph::new(4);
        let l = |i: u32| Lit::new(NodeId(i), false);
        let g5 = g.create_and(l(1), l(2));
        let g6 = g.create_and(l(3), l(4));
        let target = g.create_and(g5, g6);
        g.add_output(target);

        let synth = BruteForceSynthesizer;
        let stats = run(&mut g, 4, &synth, 4);
        assert!(stats.final_gates <= stats.initial_gates);
    }
}
