//! Maximum fanout-free cone (MFFC) and transitive fanout (TFO) computation.
//!
//! MFFC uses a dereference-counter walk rather than plain reference
//! counting: a shared "touched" list records every variable whose deref
//! count was bumped so the caller's counter array can be restored to zero
//! afterwards without scanning the whole graph.

use rustc_hash::FxHashSet;

use crate::graph::{Graph, NodeId};

/// Scratch deref-counter state reused across MFFC computations to avoid
/// reallocating a full-graph array per call.
pub struct DerefState {
    deref: Vec<i64>,
}

impl DerefState {
    /// Allocate deref counters sized to the graph's current variable count.
    #[must_use]
    pub fn new(graph: &Graph) -> Self {
        DerefState {
            deref: vec![0; graph.num_vars()],
        }
    }

    fn ensure_len(&mut self, n: usize) {
        if self.deref.len() < n {
            self.deref.resize(n, 0);
        }
    }
}

fn eff_ref(graph: &Graph, deref: &[i64], id: NodeId) -> i64 {
    graph.node(id).fanouts.len() as i64 - deref[id.0 as usize]
}

fn deref_dfs(graph: &Graph, deref: &mut [i64], touched: &mut Vec<NodeId>, id: NodeId) {
    let node = graph.node(id);
    if node.is_pi {
        return;
    }
    for fanin in [node.fanin0.var(), node.fanin1.var()] {
        if deref[fanin.0 as usize] == 0 {
            touched.push(fanin);
        }
        deref[fanin.0 as usize] += 1;
        if eff_ref(graph, deref, fanin) == 0 {
            deref_dfs(graph, deref, touched, fanin);
        }
    }
}

fn collect_dfs(
    graph: &Graph,
    deref: &[i64],
    out: &mut Vec<NodeId>,
    visited: &mut FxHashSet<NodeId>,
    id: NodeId,
) {
    if !visited.insert(id) {
        return;
    }
    let node = graph.node(id);
    out.push(id);
    if node.is_pi {
        return;
    }
    for fanin in [node.fanin0.var(), node.fanin1.var()] {
        if eff_ref(graph, deref, fanin) <= 0 && !graph.node(fanin).is_pi {
            collect_dfs(graph, deref, out, visited, fanin);
        }
    }
}

/// Compute the MFFC of `root`: the set of nodes (including `root`) that
/// become dead if `root` is disconnected from its sole user, i.e. every
/// node reachable only through `root`.
///
/// # Panics
/// Panics if `root` is a primary input or already dead — both indicate a
/// caller bug, matching this crate's "fail loudly on misuse" error policy.
pub fn compute_mffc(graph: &Graph, root: NodeId, state: &mut DerefState) -> Vec<NodeId> {
    assert!(!graph.node(root).is_pi, "MFFC root must not be a PI");
    assert!(!graph.node(root).is_dead, "MFFC root must be live");

    state.ensure_len(graph.num_vars());
    let deref = &mut state.deref;
    let mut touched = Vec::new();

    deref[root.0 as usize] = graph.node(root).fanouts.len() as i64;
    touched.push(root);
    deref_dfs(graph, deref, &mut touched, root);

    let mut mffc = Vec::new();
    let mut visited = FxHashSet::default();
    collect_dfs(graph, deref, &mut mffc, &mut visited, root);

    for id in &touched {
        deref[id.0 as usize] = 0;
    }
    mffc
}

/// Compute the MFFC of `root` as if `excluded` divisors had an extra,
/// permanent external fanout — i.e. they can never be absorbed into the
/// cone even if `root` is their only remaining user. Used when collecting
/// divisors for a window so that nodes already selected as divisor
/// candidates are never also counted as part of the rewritable cone.
pub fn compute_mffc_excluding(
    graph: &Graph,
    root: NodeId,
    excluded: &[NodeId],
    state: &mut DerefState,
) -> Vec<NodeId> {
    state.ensure_len(graph.num_vars());
    for &id in excluded {
        state.deref[id.0 as usize] = -1;
    }
    let mffc = compute_mffc(graph, root, state);
    for &id in excluded {
        state.deref[id.0 as usize] = 0;
    }
    mffc
}

/// Transitive fanout of `target`, restricted to `within` (typically a
/// window's node set), including `target` itself. Computed by forward BFS
/// over the fanout lists.
#[must_use]
pub fn compute_tfo(graph: &Graph, target: NodeId, within: &FxHashSet<NodeId>) -> FxHashSet<NodeId> {
    let mut visited = FxHashSet::default();
    let mut queue = std::collections::VecDeque::new();
    queue.push_back(target);
    visited.insert(target);
    while let Some(n) = queue.pop_front() {
        for &user in &graph.node(n).fanouts {
            if !within.contains(&user) {
                continue;
            }
            if visited.insert(user) {
                queue.push_back(user);
            }
        }
    }
    visited
}
