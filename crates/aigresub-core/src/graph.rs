//! The and-inverter graph data model.
//!
//! A graph is a flat arena of [`Node`]s indexed by variable id. Variable `0`
//! is reserved for the constant-false node. Every other variable is either a
//! primary input (no fanins) or an AND gate with two fanin literals. Edge
//! inversion is carried on the literal, not the node, following AIGER
//! convention: `lit = (var << 1) | complement_bit`.
//!
//! This crate intentionally does not build the graph on top of a generic
//! graph library. AIG nodes need dense O(1) indexing by small monotonically
//! increasing ids, per-node deref bookkeeping for MFFC computation, and
//! structural invariants enforced at construction time (canonical fanin
//! order, trivial-form elimination) — a `Vec<Node>` arena expresses all of
//! that directly.

use rustc_hash::FxHashMap;

use crate::error::{AigError, AigResult};

/// Identifies a node (primary input or AND gate) by its variable index.
///
/// Variable `0` always denotes the constant-false node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The constant-false node.
    pub const CONST: NodeId = NodeId(0);
}

/// A literal: a node reference with a complement bit.
///
/// `lit(v, false)` is the positive literal for `v`; `lit(v, true)` is its
/// complement. Encoded as `(var << 1) | complement` so that the constant
/// literals are `0` (false) and `1` (true).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lit(pub u32);

impl Lit {
    /// The constant-false literal.
    pub const FALSE: Lit = Lit(0);
    /// The constant-true literal.
    pub const TRUE: Lit = Lit(1);

    /// Build the literal for `var` with the given complement bit.
    #[must_use]
    pub fn new(var: NodeId, complement: bool) -> Self {
        Lit((var.0 << 1) | u32::from(complement))
    }

    /// The variable this literal refers to.
    #[must_use]
    pub fn var(self) -> NodeId {
        NodeId(self.0 >> 1)
    }

    /// Whether this literal is complemented.
    #[must_use]
    pub fn is_inverted(self) -> bool {
        self.0 & 1 == 1
    }

    /// The literal with the complement bit flipped.
    #[must_use]
    pub fn negate(self) -> Self {
        Lit(self.0 ^ 1)
    }

    /// The literal with the same variable but complement bit cleared.
    #[must_use]
    pub fn positive(self) -> Self {
        Lit(self.0 & !1)
    }
}

/// A single node in the graph: either a primary input or a two-input AND
/// gate.
#[derive(Debug, Clone)]
pub struct Node {
    /// First fanin literal. `Lit::FALSE` (and `fanin1 == Lit::FALSE`) marks
    /// a primary input.
    pub fanin0: Lit,
    /// Second fanin literal.
    pub fanin1: Lit,
    /// Logic level: `0` for primary inputs, `1 + max(level(fanin0), level(fanin1))`
    /// for gates.
    pub level: u32,
    /// Ids of nodes that use this node as a fanin (var-level fanout list:
    /// both polarities of use are recorded under the same entry).
    pub fanouts: Vec<NodeId>,
    /// Whether this node has been logically removed. Dead nodes retain
    /// their variable id; it is never reused.
    pub is_dead: bool,
    /// True for primary inputs (including the reserved constant at var 0).
    pub is_pi: bool,
}

impl Node {
    fn pi() -> Self {
        Node {
            fanin0: Lit::FALSE,
            fanin1: Lit::FALSE,
            level: 0,
            fanouts: Vec::new(),
            is_dead: false,
            is_pi: true,
        }
    }
}

/// An and-inverter graph: primary inputs, AND gates, and primary outputs.
///
/// Structural invariants maintained by every public mutator:
/// - fanins of a gate are in canonical order (`fanin0.0 <= fanin1.0`),
/// - a gate never has `fanin0 == fanin1` except for the trivial-form cases
///   eliminated at construction (`x AND x = x`, `x AND !x = 0`),
/// - variable ids are assigned in strictly increasing topological order,
/// - the fanout lists are the exact inverse of the fanin relation,
/// - dead nodes keep their slot; ids are never recycled.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Number of declared primary inputs (vars `1..=num_pis`).
    num_pis: usize,
    /// Primary outputs, as literals over existing variables.
    pub outputs: Vec<Lit>,
    nodes: Vec<Node>,
    /// Structural hash: canonical (fanin0, fanin1) pair -> existing node,
    /// used so `create_and` never creates a duplicate gate.
    struct_hash: FxHashMap<(Lit, Lit), NodeId>,
}

impl Graph {
    /// Build an empty graph with `num_pis` primary inputs and no gates.
    #[must_use]
    pub fn new(num_pis: usize) -> Self {
        let mut nodes = Vec::with_capacity(num_pis + 1);
        nodes.push(Node::pi()); // var 0, constant
        for _ in 0..num_pis {
            nodes.push(Node::pi());
        }
        Graph {
            num_pis,
            outputs: Vec::new(),
            nodes,
            struct_hash: FxHashMap::default(),
        }
    }

    /// Number of primary inputs.
    #[must_use]
    pub fn num_pis(&self) -> usize {
        self.num_pis
    }

    /// Number of primary outputs.
    #[must_use]
    pub fn num_pos(&self) -> usize {
        self.outputs.len()
    }

    /// Total number of variable slots, including dead ones and the constant.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live (non-dead, non-PI) AND gates.
    #[must_use]
    pub fn num_gates(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| !n.is_pi && !n.is_dead)
            .count()
    }

    /// Borrow a node by id.
    ///
    /// # Panics
    /// Panics if `id` is out of range. Use this only where `id` is already
    /// known-valid (e.g. obtained from this graph's own iteration); external
    /// callers should use [`Graph::try_node`].
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    /// Borrow a node by id, checking liveness and range.
    pub fn try_node(&self, id: NodeId) -> AigResult<&Node> {
        let node = self
            .nodes
            .get(id.0 as usize)
            .ok_or(AigError::InvalidNode(id.0))?;
        if node.is_dead {
            return Err(AigError::DeadNode(id.0));
        }
        Ok(node)
    }

    /// Iterate all node ids in increasing (topological) order.
    pub fn var_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Whether `id` is a primary input.
    #[must_use]
    pub fn is_pi(&self, id: NodeId) -> bool {
        self.node(id).is_pi
    }

    /// Whether `id` has been removed.
    #[must_use]
    pub fn is_dead(&self, id: NodeId) -> bool {
        self.node(id).is_dead
    }

    fn level_of(&self, lit: Lit) -> u32 {
        self.node(lit.var()).level
    }

    fn add_fanout(&mut self, var: NodeId, user: NodeId) {
        self.nodes[var.0 as usize].fanouts.push(user);
    }

    fn remove_fanout(&mut self, var: NodeId, user: NodeId) {
        if let Some(pos) = self.nodes[var.0 as usize]
            .fanouts
            .iter()
            .position(|&u| u == user)
        {
            self.nodes[var.0 as usize].fanouts.swap_remove(pos);
        }
    }

    /// Create (or structurally reuse) the AND of two literals.
    ///
    /// Applies canonical fanin ordering and the standard trivial-form
    /// simplifications (`x & 0 = 0`, `x & 1 = x`, `x & x = x`,
    /// `x & !x = 0`) so the result is never a redundant gate.
    pub fn create_and(&mut self, mut a: Lit, mut b: Lit) -> Lit {
        if a == Lit::FALSE || b == Lit::FALSE {
            return Lit::FALSE;
        }
        if a == Lit::TRUE {
            return b;
        }
        if b == Lit::TRUE {
            return a;
        }
        if a == b {
            return a;
        }
        if a == b.negate() {
            return Lit::FALSE;
        }
        if a.0 > b.0 {
            std::mem::swap(&mut a, &mut b);
        }
        if let Some(&existing) = self.struct_hash.get(&(a, b)) {
            return Lit::new(existing, false);
        }

        let id = NodeId(self.nodes.len() as u32);
        let level = 1 + self.level_of(a).max(self.level_of(b));
        self.nodes.push(Node {
            fanin0: a,
            fanin1: b,
            level,
            fanouts: Vec::new(),
            is_dead: false,
            is_pi: false,
        });
        self.add_fanout(a.var(), id);
        self.add_fanout(b.var(), id);
        self.struct_hash.insert((a, b), id);
        Lit::new(id, false)
    }

    /// Append a primary output.
    pub fn add_output(&mut self, lit: Lit) {
        self.outputs.push(lit);
    }

    /// Redirect every fanout and output reference to `old` so that it
    /// instead points at `new`, XOR-combining the complement bits, then
    /// mark `old` dead if it has no remaining uses.
    ///
    /// This is the core rewrite primitive: callers splicing in a
    /// substitute subcircuit call this once with `old` set to the
    /// original target's positive literal and `new` set to the
    /// substitute's root literal.
    pub fn replace_node(&mut self, old: NodeId, new: Lit) -> AigResult<()> {
        if old == new.var() {
            return Ok(());
        }
        let users = self.node(old).fanouts.clone();
        for user in &users {
            if self.node(*user).is_dead {
                continue;
            }
            let (f0, f1) = (self.node(*user).fanin0, self.node(*user).fanin1);
            let mut changed = false;
            let mut nf0 = f0;
            let mut nf1 = f1;
            if f0.var() == old {
                nf0 = Lit::new(new.var(), f0.is_inverted() ^ new.is_inverted());
                changed = true;
            }
            if f1.var() == old {
                nf1 = Lit::new(new.var(), f1.is_inverted() ^ new.is_inverted());
                changed = true;
            }
            if changed {
                self.rewire_gate(*user, nf0, nf1)?;
            }
        }
        for out in &mut self.outputs {
            if out.var() == old {
                *out = Lit::new(new.var(), out.is_inverted() ^ new.is_inverted());
            }
        }
        if self.node(old).fanouts.is_empty() {
            self.mark_dead(old);
        }
        Ok(())
    }

    /// Rewrite a gate's fanins in place (used by [`Graph::replace_node`]),
    /// preserving canonical ordering and fanout bookkeeping.
    fn rewire_gate(&mut self, gate: NodeId, mut f0: Lit, mut f1: Lit) -> AigResult<()> {
        if f0.0 > f1.0 {
            std::mem::swap(&mut f0, &mut f1);
        }
        let (old0, old1) = (self.node(gate).fanin0, self.node(gate).fanin1);
        if old0.var() != f0.var() {
            self.remove_fanout(old0.var(), gate);
            self.add_fanout(f0.var(), gate);
        }
        if old1.var() != f1.var() {
            self.remove_fanout(old1.var(), gate);
            self.add_fanout(f1.var(), gate);
        }
        let level = 1 + self.level_of(f0).max(self.level_of(f1));
        let n = &mut self.nodes[gate.0 as usize];
        n.fanin0 = f0;
        n.fanin1 = f1;
        n.level = level;
        Ok(())
    }

    fn mark_dead(&mut self, id: NodeId) {
        if self.node(id).is_pi || self.node(id).is_dead {
            return;
        }
        let (f0, f1) = (self.node(id).fanin0, self.node(id).fanin1);
        self.remove_fanout(f0.var(), id);
        self.remove_fanout(f1.var(), id);
        self.nodes[id.0 as usize].is_dead = true;
        self.nodes[id.0 as usize].fanouts.clear();
    }

    /// Remove every node in a node's MFFC (as computed by
    /// [`crate::mffc::compute_mffc`]), typically called right after
    /// [`Graph::replace_node`] has detached the root.
    pub fn remove_mffc(&mut self, mffc: &[NodeId]) {
        // Removal must proceed in reverse topological order so a node's
        // fanins still have accurate fanout counts when it is retired.
        let mut sorted = mffc.to_vec();
        sorted.sort_by_key(|n| std::cmp::Reverse(n.0));
        for id in sorted {
            self.mark_dead(id);
        }
    }

    /// Whether `target` is reachable from any of `from` by following fanin
    /// edges (used by the inserter to reject candidates that would create
    /// a cycle through a selected divisor).
    #[must_use]
    pub fn reaches(&self, from: &[NodeId], target: NodeId) -> bool {
        let mut stack: Vec<NodeId> = from.to_vec();
        let mut seen = rustc_hash::FxHashSet::default();
        while let Some(n) = stack.pop() {
            if n == target {
                return true;
            }
            if !seen.insert(n) {
                continue;
            }
            let node = self.node(n);
            if !node.is_pi {
                stack.push(node.fanin0.var());
                stack.push(node.fanin1.var());
            }
        }
        false
    }

    /// A compact, human-readable dump of all live nodes, used by verbose
    /// logging and by tests.
    #[must_use]
    pub fn dump(&self) -> String {
        use std::fmt::Write;
        let mut s = String::new();
        for id in self.var_ids() {
            let n = self.node(id);
            if n.is_dead {
                continue;
            }
            if n.is_pi {
                if id.0 != 0 {
                    let _ = writeln!(s, "{}: PI", id.0);
                }
            } else {
                let _ = writeln!(
                    s,
                    "{}: AND({}{}, {}{}) lvl={}",
                    id.0,
                    if n.fanin0.is_inverted() { "!" } else { "" },
                    n.fanin0.var().0,
                    if n.fanin1.is_inverted() { "!" } else { "" },
                    n.fanin1.var().0,
                    n.level,
                );
            }
        }
        for (i, o) in self.outputs.iter().enumerate() {
            let _ = writeln!(
                s,
                "PO{}: {}{}",
                i,
                if o.is_inverted() { "!" } else { "" },
                o.var().0
            );
        }
        s
    }

    /// Verify the structural invariants documented on [`Graph`]. Used by
    /// property tests after random mutation sequences.
    pub fn verify_integrity(&self) -> AigResult<()> {
        for id in self.var_ids() {
            let n = self.node(id);
            if n.is_dead || n.is_pi {
                continue;
            }
            if n.fanin0.0 > n.fanin1.0 {
                return Err(AigError::StructuralInvariant(format!(
                    "node {} has non-canonical fanin order",
                    id.0
                )));
            }
            if n.fanin0.var().0 >= id.0 || n.fanin1.var().0 >= id.0 {
                return Err(AigError::StructuralInvariant(format!(
                    "node {} fanin does not precede it topologically",
                    id.0
                )));
            }
            for fanin in [n.fanin0.var(), n.fanin1.var()] {
                if !self.node(fanin).fanouts.contains(&id) {
                    return Err(AigError::StructuralInvariant(format!(
                        "node {} missing from fanout list of its fanin {}",
                        id.0, fanin.0
                    )));
                }
            }
        }
        for id in self.var_ids() {
            let n = self.node(id);
            for &user in &n.fanouts {
                let u = self.node(user);
                if u.is_dead {
                    return Err(AigError::StructuralInvariant(format!(
                        "dead node {} still listed as fanout user of {}",
                        user.0, id.0
                    )));
                }
                if u.fanin0.var() != id && u.fanin1.var() != id {
                    return Err(AigError::StructuralInvariant(format!(
                        "node {} lists {} as fanout but does not use it",
                        id.0, user.0
                    )));
                }
            }
        }
        Ok(())
    }
}
