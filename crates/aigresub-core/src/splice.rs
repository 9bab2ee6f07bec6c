//! Splicing a synthesized [`SubAig`] into the host graph in place of its
//! target, retiring the replaced cone.

use crate::error::AigResult;
use crate::graph::{Graph, Lit, NodeId};
use crate::mffc::{compute_mffc, DerefState};
use crate::synth::SubAig;

/// Import `sub` under `host_inputs` (its positional input map, ordered
/// `window.inputs ++ extra selected divisors`) in place of `target`:
///
/// 1. translate each of `sub`'s gates into a newly created host gate,
/// 2. redirect `target`'s fanouts and host POs to the translated root,
/// 3. retire `target`'s MFFC, computed before the redirection detaches it.
///
/// # Panics
/// Panics if `host_inputs.len() != sub.num_pis` — a caller bug (the window
/// extraction and synthesis adapter always agree on this count).
pub fn splice(graph: &mut Graph, target: NodeId, host_inputs: &[NodeId], sub: &SubAig) -> AigResult<()> {
    assert_eq!(
        host_inputs.len(),
        sub.num_pis,
        "host input map does not match SubAig's declared PI count"
    );

    // The MFFC must be computed before `replace_node` detaches `target`:
    // it seeds `target`'s own deref count from its *current* fanout list.
    let mut state = DerefState::new(graph);
    let mffc = compute_mffc(graph, target, &mut state);

    let mut map: Vec<Lit> = Vec::with_capacity(sub.num_vars());
    map.push(Lit::FALSE);
    for &h in host_inputs {
        map.push(Lit::new(h, false));
    }
    for &(fa, fb) in &sub.gates {
        let a = translate(&map, fa);
        let b = translate(&map, fb);
        map.push(graph.create_and(a, b));
    }
    let root = translate(&map, sub.po);

    graph.replace_node(target, root)?;
    graph.remove_mffc(&mffc);
    Ok(())
}

fn translate(map: &[Lit], lit: Lit) -> Lit {
    let base = map[lit.var().0 as usize];
    if lit.is_inverted() {
        base.negate()
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::simulate;

    /// Splice a 1-gate SubAig (`AND(i0, i1)`) in place of a target whose
    /// MFFC contains 2 gates, and check both the gate-count delta and the
    /// host's surviving output value.
    #[test]
    fn splice_reduces_gate_count_and_preserves_output() {
        let mut g = Graph::new(4);
        let l = |i: u32| Lit::new(NodeId(i), false);
        // target = (1&2) & (3&4): MFFC = {g5, g6, target} size 3 if both
        // g5, g6 have no other use.
        let g5 = g.create_and(l(1), l(2));
        let g6 = g.create_and(l(3), l(4));
        let target = g.create_and(g5, g6);
        g.add_output(target);
        let before = g.num_gates();

        let sub = SubAig {
            num_pis: 2,
            gates: vec![(Lit::new(NodeId(1), false), Lit::new(NodeId(2), false))],
            po: Lit::new(NodeId(3), false),
        };
        splice(&mut g, target.var(), &[NodeId(1), NodeId(3)], &sub).unwrap();

        assert_eq!(g.num_gates(), before - 2); // 3 removed, 1 added

        for a in 0..2u64 {
            for b in 0..2u64 {
                for c in 0..2u64 {
                    for d in 0..2u64 {
                        let patterns = vec![
                            vec![if a == 1 { u64::MAX } else { 0 }],
                            vec![if b == 1 { u64::MAX } else { 0 }],
                            vec![if c == 1 { u64::MAX } else { 0 }],
                            vec![if d == 1 { u64::MAX } else { 0 }],
                        ];
                        let out = simulate(&g, &patterns, &g.outputs.clone());
                        let expected = if a == 1 && c == 1 { u64::MAX } else { 0 };
                        assert_eq!(out[0][0], expected, "a={a} b={b} c={c} d={d}");
                    }
                }
            }
        }
    }
}
