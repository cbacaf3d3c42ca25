//! Dialogue execution: per-dialogue context, turn orchestration, state
//! snapshots and their reconciliation with the reference annotation.

mod batch;
mod context;
mod dataset;
mod goals;
mod orchestrator;
mod patch;
mod reconcile;
mod source;
mod state;

pub use batch::{BatchOptions, BatchReport, ServiceFilter, run_batch};
pub use context::DialogueContext;
pub use dataset::{Dialogue, Frame, FrameState, Speaker, Turn, TurnActs, attach_dialog_acts};
pub use goals::GoalStack;
pub use orchestrator::{DialogueOutcome, Orchestrator, TurnRecord};
pub use patch::Patch;
pub use reconcile::compare_dialogue_state;
pub use source::{AnnotatedExpressions, ExpressionSource, ScriptedSource};
pub use state::DialogueState;
