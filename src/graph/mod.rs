//! The dataflow graph: an arena of typed nodes joined by named input edges.
//!
//! Children may be shared by several parents; a node lives as long as the arena.
//! Each node also carries a `result` lookup edge that points at the node itself
//! while it is unresolved and at another node once execution resolves it.

mod builder;
mod duplicate;
mod kind;

pub use builder::{GraphBuilder, NodeRegistry};
pub use duplicate::duplicate_subgraph;
pub use kind::NodeKind;

use ahash::{AHashMap, AHashSet};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Index of a node in its graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node instance.
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    inputs: IndexMap<String, NodeId>,
    value: Option<String>,
    result: NodeId,
    evaluated: bool,
    duplicate_of: Option<NodeId>,
    counters: AHashMap<String, u32>,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Ordered slot -> child edges.
    pub fn inputs(&self) -> &IndexMap<String, NodeId> {
        &self.inputs
    }

    /// Literal payload of a `Str` node.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    /// The node this one was copied from by a revision, if any.
    pub fn duplicate_of(&self) -> Option<NodeId> {
        self.duplicate_of
    }
}

/// Arena owning every node created during one dialogue.
///
/// Node identifiers are only issued by the arena itself, so lookups index
/// directly; passing an id from a different graph panics.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let mut node = Node {
            kind,
            inputs: IndexMap::new(),
            value: None,
            result: id,
            evaluated: false,
            duplicate_of: None,
            counters: AHashMap::new(),
        };
        kind.behavior().init(&mut node.counters);
        self.nodes.push(node);
        id
    }

    /// Adds a literal leaf.
    pub fn add_str(&mut self, value: impl Into<String>) -> NodeId {
        let id = self.add(NodeKind::Str);
        self.nodes[id.index()].value = Some(value.into());
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].kind
    }

    pub fn input(&self, id: NodeId, slot: &str) -> Option<NodeId> {
        self.nodes[id.index()].inputs.get(slot).copied()
    }

    /// The input with its result edge followed.
    pub fn input_view(&self, id: NodeId, slot: &str) -> Option<NodeId> {
        self.input(id, slot).map(|child| self.resolve(child))
    }

    pub fn has_input(&self, id: NodeId, slot: &str) -> bool {
        self.nodes[id.index()].inputs.contains_key(slot)
    }

    /// Connects `child` to `parent.slot`, replacing any previous child in place.
    pub fn connect(&mut self, parent: NodeId, slot: &str, child: NodeId) {
        self.nodes[parent.index()]
            .inputs
            .insert(slot.to_string(), child);
    }

    pub fn disconnect(&mut self, parent: NodeId, slot: &str) -> Option<NodeId> {
        self.nodes[parent.index()].inputs.shift_remove(slot)
    }

    pub fn result(&self, id: NodeId) -> NodeId {
        self.nodes[id.index()].result
    }

    pub fn set_result(&mut self, id: NodeId, target: NodeId) {
        self.nodes[id.index()].result = target;
    }

    pub fn is_resolved(&self, id: NodeId) -> bool {
        self.result(id) != id
    }

    /// Follows result edges until reaching an unresolved node.
    pub fn resolve(&self, id: NodeId) -> NodeId {
        let mut current = id;
        for _ in 0..self.nodes.len() {
            let next = self.result(current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    pub fn is_evaluated(&self, id: NodeId) -> bool {
        self.nodes[id.index()].evaluated
    }

    pub fn mark_evaluated(&mut self, id: NodeId) {
        self.nodes[id.index()].evaluated = true;
    }

    pub fn value(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.index()].value.as_deref()
    }

    /// First literal found under `id`, children before parents.
    pub fn first_literal(&self, id: NodeId) -> Option<&str> {
        self.topological_order(id, false)
            .into_iter()
            .find_map(|n| self.value(n))
    }

    /// Literal value of `id.slot`, looking through wrappers such as `LIKE(Name(..))`.
    pub fn get_dat(&self, id: NodeId, slot: &str) -> Option<&str> {
        self.input(id, slot).and_then(|child| self.first_literal(child))
    }

    /// Literal values of every populated slot, in slot order.
    pub fn dats(&self, id: NodeId) -> IndexMap<String, String> {
        self.node(id)
            .inputs
            .iter()
            .filter_map(|(slot, child)| {
                self.first_literal(*child)
                    .map(|v| (slot.clone(), v.to_string()))
            })
            .collect()
    }

    /// Nodes reachable from `root`, every child listed before its parents.
    pub fn topological_order(&self, root: NodeId, follow_results: bool) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut visited = AHashSet::new();
        self.visit(root, follow_results, &mut visited, &mut order);
        order
    }

    fn visit(
        &self,
        id: NodeId,
        follow_results: bool,
        visited: &mut AHashSet<NodeId>,
        order: &mut Vec<NodeId>,
    ) {
        if !visited.insert(id) {
            return;
        }
        for child in self.node(id).inputs.values() {
            self.visit(*child, follow_results, visited, order);
        }
        if follow_results && self.is_resolved(id) {
            self.visit(self.result(id), follow_results, visited, order);
        }
        order.push(id);
    }

    /// First node under `root` (children first) matching `pred`.
    pub fn find_in(
        &self,
        root: NodeId,
        follow_results: bool,
        pred: impl Fn(NodeKind) -> bool,
    ) -> Option<NodeId> {
        self.topological_order(root, follow_results)
            .into_iter()
            .find(|n| pred(self.kind(*n)))
    }

    pub fn count(&self, id: NodeId, name: &str) -> u32 {
        self.nodes[id.index()]
            .counters
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    /// True while `count(name)` is below the `max_<name>` limit.
    pub fn count_ok(&self, id: NodeId, name: &str) -> bool {
        self.count(id, name) < self.count(id, &format!("max_{}", name))
    }

    pub fn inc_count(&mut self, id: NodeId, name: &str) {
        *self.nodes[id.index()]
            .counters
            .entry(name.to_string())
            .or_insert(0) += 1;
    }

    /// Copies a node: same kind, literal, inputs and counters, but unresolved,
    /// unevaluated, and remembering its origin.
    pub fn duplicate_node(&mut self, id: NodeId) -> NodeId {
        let new_id = NodeId(self.nodes.len() as u32);
        let mut copy = self.nodes[id.index()].clone();
        copy.result = new_id;
        copy.evaluated = false;
        copy.duplicate_of = Some(id);
        self.nodes.push(copy);
        new_id
    }
}
