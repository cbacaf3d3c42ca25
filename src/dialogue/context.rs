use super::goals::GoalStack;
use crate::config::EngineConfig;
use crate::datastore::Datastore;
use crate::error::ExpressionError;
use crate::expression::{Expr, parse_expression};
use crate::graph::{Graph, GraphBuilder, NodeId, NodeRegistry};
use crate::nodes::AvailabilityCheck;
use crate::oracle::AgentTurn;
use crate::signal::Suggestion;

/// Mutable state of one dialogue, plus the collaborators its nodes consult.
///
/// The graph and goal stack are owned here and live for the whole dialogue;
/// the datastore, availability check, registry and configuration are borrowed
/// from the caller and shared across dialogues.
pub struct DialogueContext<'a> {
    pub graph: Graph,
    pub goals: GoalStack,
    registry: &'a NodeRegistry,
    datastore: &'a dyn Datastore,
    availability: &'a dyn AvailabilityCheck,
    config: &'a EngineConfig,
    agent_turn: Option<AgentTurn>,
    messages: Vec<(NodeId, String)>,
    pending_suggestion: Option<Suggestion>,
    confirmations: u32,
}

impl<'a> DialogueContext<'a> {
    pub fn new(
        registry: &'a NodeRegistry,
        datastore: &'a dyn Datastore,
        availability: &'a dyn AvailabilityCheck,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            graph: Graph::new(),
            goals: GoalStack::new(),
            registry,
            datastore,
            availability,
            config,
            agent_turn: None,
            messages: Vec::new(),
            pending_suggestion: None,
            confirmations: 0,
        }
    }

    pub fn config(&self) -> &'a EngineConfig {
        self.config
    }

    pub fn datastore(&self) -> &'a dyn Datastore {
        self.datastore
    }

    pub fn availability(&self) -> &'a dyn AvailabilityCheck {
        self.availability
    }

    /// The reference agent turn answering the current user turn.
    pub fn agent_turn(&self) -> Option<&AgentTurn> {
        self.agent_turn.as_ref()
    }

    pub fn set_agent_turn(&mut self, turn: Option<AgentTurn>) {
        self.agent_turn = turn;
    }

    /// Records a plain agent message produced by `node`.
    pub fn add_message(&mut self, node: NodeId, message: impl Into<String>) {
        self.messages.push((node, message.into()));
    }

    pub fn messages(&self) -> &[(NodeId, String)] {
        &self.messages
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    /// Issues the next engine confirmation code, e.g. `XYZ00001`.
    pub fn next_confirmation_code(&mut self) -> String {
        self.confirmations += 1;
        format!("{}{:05}", self.config.confirmation_prefix, self.confirmations)
    }

    /// Adds the nodes of `expr` to the graph and returns its root.
    pub fn build(&mut self, expr: &Expr) -> Result<NodeId, ExpressionError> {
        GraphBuilder::new(&mut self.graph, self.registry).build(expr)
    }

    /// Parses `source` and adds its nodes to the graph.
    pub fn construct(&mut self, source: &str) -> Result<NodeId, ExpressionError> {
        let expr = parse_expression(source)?;
        self.build(&expr)
    }

    pub fn pending_suggestion(&self) -> Option<&Suggestion> {
        self.pending_suggestion.as_ref()
    }

    pub fn set_pending_suggestion(&mut self, suggestion: Option<Suggestion>) {
        self.pending_suggestion = suggestion;
    }

    pub fn take_pending_suggestion(&mut self) -> Option<Suggestion> {
        self.pending_suggestion.take()
    }
}
