//! Raised control-flow conditions that carry agent-facing text.

use crate::graph::NodeId;
use serde::Serialize;
use std::fmt;

/// Kind of a raised signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SignalKind {
    /// A required slot has not been supplied yet.
    MissingValue,
    /// A populated slot violates a domain rule.
    InvalidInput,
    /// The datastore has no match.
    ElementNotFound,
    /// The datastore has several matches where one was expected.
    MultipleEntriesSingleton,
    /// The reference trace overrides the node's own text.
    Oracle,
    /// The turn's annotation could not be turned into an expression.
    ConversionError,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalKind::MissingValue => "MissingValue",
            SignalKind::InvalidInput => "InvalidInput",
            SignalKind::ElementNotFound => "ElementNotFound",
            SignalKind::MultipleEntriesSingleton => "MultipleEntriesSingleton",
            SignalKind::Oracle => "Oracle",
            SignalKind::ConversionError => "ConversionError",
        };
        f.write_str(name)
    }
}

/// A pair of alternative follow-up expressions offered with a signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub reject: String,
    pub accept: String,
    /// Apply `accept` automatically before the next turn unless that turn
    /// explicitly accepts or rejects.
    pub implicit_accept: bool,
    /// Message attached to the turn when the accept branch is applied implicitly.
    pub message: Option<String>,
}

impl Suggestion {
    pub fn new(reject: impl Into<String>, accept: impl Into<String>) -> Self {
        Self {
            reject: reject.into(),
            accept: accept.into(),
            implicit_accept: false,
            message: None,
        }
    }

    pub fn implicit(mut self) -> Self {
        self.implicit_accept = true;
        self
    }
}

/// A raised condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub node: Option<NodeId>,
    pub message: String,
    /// The missing slot, for `MissingValue`.
    pub slot: Option<String>,
    pub suggestion: Option<Suggestion>,
    pub objects: Vec<NodeId>,
}

impl Signal {
    pub fn new(kind: SignalKind, node: Option<NodeId>, message: impl Into<String>) -> Self {
        Self {
            kind,
            node,
            message: message.into(),
            slot: None,
            suggestion: None,
            objects: Vec::new(),
        }
    }

    pub fn missing_value(node: NodeId, slot: &str, message: impl Into<String>) -> Self {
        let mut signal = Self::new(SignalKind::MissingValue, Some(node), message);
        signal.slot = Some(slot.to_string());
        signal
    }

    pub fn invalid_input(node: NodeId, message: impl Into<String>) -> Self {
        Self::new(SignalKind::InvalidInput, Some(node), message)
    }

    pub fn element_not_found(node: NodeId, message: impl Into<String>) -> Self {
        Self::new(SignalKind::ElementNotFound, Some(node), message)
    }

    pub fn multiple_entries(node: NodeId, message: impl Into<String>) -> Self {
        Self::new(SignalKind::MultipleEntriesSingleton, Some(node), message)
    }

    pub fn oracle(node: NodeId, message: impl Into<String>) -> Self {
        Self::new(SignalKind::Oracle, Some(node), message)
    }

    pub fn conversion(message: impl Into<String>) -> Self {
        Self::new(SignalKind::ConversionError, None, message)
    }

    pub fn with_suggestion(mut self, suggestion: Option<Suggestion>) -> Self {
        self.suggestion = suggestion;
        self
    }

    pub fn with_objects(mut self, objects: Vec<NodeId>) -> Self {
        self.objects = objects;
        self
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
