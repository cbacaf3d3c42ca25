use crate::graph::NodeId;
use crate::signal::Signal;
use thiserror::Error;

/// Errors raised while parsing a program expression or turning it into graph nodes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Failed to parse expression '{input}': {message}")]
    Syntax { input: String, message: String },

    #[error("Unknown node type '{0}'")]
    UnknownNodeType(String),

    #[error("Node type '{node_type}' has no slot named '{slot}'")]
    UnknownSlot { node_type: String, slot: String },

    #[error("Slot '{slot}' of node type '{node_type}' is derived and cannot be supplied")]
    DerivedSlot { node_type: String, slot: String },

    #[error("Node type '{node_type}' accepts {max} positional inputs, but received {found}")]
    TooManyPositional {
        node_type: String,
        max: usize,
        found: usize,
    },

    #[error("Slot '{slot}' of node type '{node_type}' was supplied more than once")]
    DuplicateSlot { node_type: String, slot: String },
}

/// Structural errors on the node arena.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node {node} has no input '{slot}'")]
    MissingInput { node: NodeId, slot: String },

    #[error("Node {old} is not reachable from root {root}")]
    NotReachable { root: NodeId, old: NodeId },
}

/// Errors that can occur while loading or querying a datastore.
#[derive(Error, Debug, Clone)]
pub enum DatastoreError {
    #[error("Failed to read datastore file: {0}")]
    Io(String),

    #[error("Failed to parse datastore JSON: {0}")]
    JsonParseError(String),

    #[error("Row {index} of table '{table}' is not a JSON object")]
    InvalidRow { table: String, index: usize },
}

/// Errors that can occur while loading an engine configuration.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(String),

    #[error("Failed to parse config JSON: {0}")]
    JsonParseError(String),
}

/// Errors that can occur while loading dialogues or patch files.
#[derive(Error, Debug, Clone)]
pub enum DialogueError {
    #[error("Failed to read '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse dialogue JSON: {0}")]
    JsonParseError(String),

    #[error("Malformed patch line {line}: '{content}'")]
    MalformedPatch { line: usize, content: String },
}

/// Any unexpected, non-signal fault raised while evaluating a turn.
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Datastore(#[from] DatastoreError),
}

/// Interruption of node execution.
///
/// `Signal` is the regular channel for producing agent text; `Fault` is everything else.
#[derive(Debug, Clone)]
pub enum Interrupt {
    Signal(Box<Signal>),
    Fault(EngineError),
}

impl From<Signal> for Interrupt {
    fn from(signal: Signal) -> Self {
        Interrupt::Signal(Box::new(signal))
    }
}

impl From<EngineError> for Interrupt {
    fn from(err: EngineError) -> Self {
        Interrupt::Fault(err)
    }
}

impl From<GraphError> for Interrupt {
    fn from(err: GraphError) -> Self {
        Interrupt::Fault(err.into())
    }
}

impl From<ExpressionError> for Interrupt {
    fn from(err: ExpressionError) -> Self {
        Interrupt::Fault(err.into())
    }
}

impl From<DatastoreError> for Interrupt {
    fn from(err: DatastoreError) -> Self {
        Interrupt::Fault(err.into())
    }
}

/// Result of executing a node or evaluating a subgraph.
pub type ExecResult<T = ()> = Result<T, Interrupt>;
