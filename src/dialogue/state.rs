use crate::graph::{Graph, NodeId};
use crate::nodes;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Slot values of the engine after one turn, keyed `"<domain>-<slot>"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueState {
    pub turn_id: String,
    pub slot_values: IndexMap<String, Vec<String>>,
}

impl DialogueState {
    pub fn new(turn_id: impl Into<String>) -> Self {
        Self {
            turn_id: turn_id.into(),
            slot_values: IndexMap::new(),
        }
    }

    /// Snapshot built from every goal, later goals overriding earlier ones.
    pub fn collect(graph: &Graph, goals: &[NodeId], turn_id: impl Into<String>) -> Self {
        let mut state = Self::new(turn_id);
        for goal in goals {
            nodes::collect_state(graph, *goal, &mut state);
        }
        state
    }

    pub fn set(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.slot_values.insert(key.into(), values);
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.slot_values.get(key).map(Vec::as_slice)
    }

    /// First value of a slot; empty string when the slot is present without value.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)
            .map(|values| values.first().map(String::as_str).unwrap_or(""))
    }

    pub fn len(&self) -> usize {
        self.slot_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slot_values.is_empty()
    }
}
