//! AIGER codec round-trip and ASCII/binary agreement tests.

use aigresub_core::aiger;
use aigresub_core::graph::{Graph, Lit, NodeId};

fn sample_graph() -> Graph {
    let mut g = Graph::new(4);
    let l = |i: u32| Lit::new(NodeId(i), false);
    let g5 = g.create_and(l(1), l(2));
    let g6 = g.create_and(l(3), l(4).negate());
    let g7 = g.create_and(g5, g6);
    g.add_output(g7);
    g.add_output(g5.negate());
    g
}

#[test]
fn ascii_round_trip_preserves_gate_count_and_outputs() {
    let g = sample_graph();
    let text = aiger::write_ascii(&g);
    let parsed = aiger::read_aiger(text.as_bytes()).unwrap();
    assert_eq!(parsed.num_gates(), g.num_gates());
    assert_eq!(parsed.num_pos(), g.num_pos());
    assert_eq!(parsed.num_pis(), g.num_pis());
}

#[test]
fn binary_round_trip_preserves_gate_count_and_outputs() {
    let g = sample_graph();
    let data = aiger::write_binary(&g);
    let parsed = aiger::read_aiger(&data).unwrap();
    assert_eq!(parsed.num_gates(), g.num_gates());
    assert_eq!(parsed.num_pos(), g.num_pos());
    assert_eq!(parsed.num_pis(), g.num_pis());
}

#[test]
fn ascii_and_binary_encodings_parse_to_equivalent_graphs() {
    use aigresub_core::sim::{input_pattern, simulate};

    let g = sample_graph();
    let ascii_parsed = aiger::read_aiger(aiger::write_ascii(&g).as_bytes()).unwrap();
    let binary_parsed = aiger::read_aiger(&aiger::write_binary(&g)).unwrap();

    let patterns: Vec<Vec<u64>> = (0..g.num_pis()).map(|i| input_pattern(i, 1)).collect();
    let ascii_out = simulate(&ascii_parsed, &patterns, &ascii_parsed.outputs.clone());
    let binary_out = simulate(&binary_parsed, &patterns, &binary_parsed.outputs.clone());
    assert_eq!(ascii_out, binary_out);
}

#[test]
fn sequential_circuits_are_rejected() {
    // aag header with one latch: M I L O A = 2 1 1 1 0
    let text = "aag 2 1 1 1 0\n2\n4 2\n4\n";
    let result = aiger::read_aiger(text.as_bytes());
    assert!(result.is_err());
}

#[test]
fn malformed_header_is_rejected() {
    let result = aiger::read_aiger(b"not an aiger file\n");
    assert!(result.is_err());
}
