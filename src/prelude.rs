//! Prelude module for convenient imports
//!
//! Re-exports the types most programs need to load data, run dialogues and
//! inspect their outcomes.
//!
//! # Example
//!
//! ```rust,no_run
//! use turnflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let datastore = InMemoryDatastore::from_file("path/to/db.json")?;
//! let dialogues = Dialogue::from_file("path/to/dialogues.json")?;
//!
//! let source = AnnotatedExpressions;
//! let orchestrator = Orchestrator::new(&datastore, &source, EngineConfig::default());
//! let report = run_batch(&orchestrator, &dialogues, &BatchOptions::default());
//!
//! println!("{}", ReportFormatter::format_summary(&report));
//! # Ok(())
//! # }
//! ```

// Running dialogues
pub use crate::config::EngineConfig;
pub use crate::dialogue::{
    AnnotatedExpressions, BatchOptions, BatchReport, Dialogue, DialogueContext, DialogueOutcome,
    DialogueState, ExpressionSource, Orchestrator, Patch, ScriptedSource, ServiceFilter, Turn,
    TurnRecord, attach_dialog_acts, run_batch,
};

// Data access
pub use crate::datastore::{Datastore, InMemoryDatastore, Predicate, Row};
pub use crate::oracle::AgentTurn;
pub use crate::schema::Domain;

// Graph and expressions
pub use crate::evaluator::{evaluate, execute_expression};
pub use crate::expression::{Expr, parse_expression};
pub use crate::graph::{Graph, NodeId, NodeKind, NodeRegistry};
pub use crate::nodes::{Availability, AvailabilityCheck, BookingRequest, OracleAvailability};
pub use crate::signal::{Signal, SignalKind, Suggestion};

// Error types
pub use crate::error::{
    ConfigError, DatastoreError, DialogueError, EngineError, ExecResult, ExpressionError,
    GraphError, Interrupt,
};

// Reports
pub use crate::report::ReportFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
