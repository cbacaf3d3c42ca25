//! Domain node behavior.
//!
//! Every node variant implements [`NodeBehavior`]; domains differ only in the
//! field lists and templates they pass through the shared control flow.

mod book;
mod describe;
mod entity;
mod find;
mod revise;
mod suggest;

pub use book::{Availability, AvailabilityCheck, BookTask, BookingRequest, ConfirmationNode, OracleAvailability};
pub use describe::{and_values, compose_search_message};
pub use entity::{BookInfoNode, EntityNode};
pub use find::FindTask;
pub use revise::{ReviseTask, raise_or_create_task};
pub use suggest::{SuggestTask, name_rejection_suggestion};

use crate::datastore::Predicate;
use crate::dialogue::{DialogueContext, DialogueState};
use crate::error::ExecResult;
use crate::graph::{Graph, NodeId};
use ahash::AHashMap;

/// Capabilities shared by all node variants.
pub trait NodeBehavior {
    /// Initializes per-node counters on creation.
    fn init(&self, _counters: &mut AHashMap<String, u32>) {}

    /// Runs the node once all of its inputs have been evaluated.
    fn execute(&self, _ctx: &mut DialogueContext<'_>, _id: NodeId) -> ExecResult {
        Ok(())
    }

    /// Short agent-facing description.
    fn describe(&self, graph: &Graph, id: NodeId) -> String {
        graph.first_literal(id).unwrap_or_default().to_string()
    }

    /// Adds this node's slice of the dialogue state.
    fn collect_state(&self, _graph: &Graph, _id: NodeId, _state: &mut DialogueState) {}

    /// Datastore predicates expressed by this node's slots.
    fn query_predicates(&self, _graph: &Graph, _id: NodeId) -> Vec<Predicate> {
        Vec::new()
    }
}

/// Behavior of literals, wrappers and no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passive;

impl NodeBehavior for Passive {}

pub fn describe(graph: &Graph, id: NodeId) -> String {
    graph.kind(id).behavior().describe(graph, id)
}

pub fn collect_state(graph: &Graph, id: NodeId, state: &mut DialogueState) {
    graph.kind(id).behavior().collect_state(graph, id, state)
}

pub fn query_predicates(graph: &Graph, id: NodeId) -> Vec<Predicate> {
    graph.kind(id).behavior().query_predicates(graph, id)
}

/// Slot values recorded as dialogue state: the first literal under each input.
fn collect_slots(graph: &Graph, id: NodeId, prefix: &str, state: &mut DialogueState) {
    for (slot, child) in graph.node(id).inputs() {
        let values = graph
            .first_literal(*child)
            .map(|v| vec![v.to_string()])
            .unwrap_or_default();
        state.set(format!("{}-{}", prefix, slot), values);
    }
}
