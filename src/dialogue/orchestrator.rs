use super::context::DialogueContext;
use super::dataset::{Dialogue, Turn};
use super::patch::Patch;
use super::reconcile::compare_dialogue_state;
use super::source::ExpressionSource;
use super::state::DialogueState;
use crate::config::EngineConfig;
use crate::datastore::Datastore;
use crate::error::{EngineError, ExecResult, Interrupt};
use crate::evaluator::execute_expression;
use crate::expression::{Expr, parse_expression};
use crate::graph::NodeRegistry;
use crate::nodes::{self, AvailabilityCheck, OracleAvailability};
use crate::signal::{Signal, SignalKind, Suggestion};
use serde::Serialize;
use tracing::{debug, info, warn};

const ACCEPT: &str = "AcceptSuggestion";
const REJECT: &str = "RejectSuggestion";

/// What happened in one user turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnRecord {
    pub turn_id: String,
    pub user_utterance: String,
    pub agent_utterance: Option<String>,
    pub expression: String,
    /// Agent text per sub-expression.
    pub answers: Vec<String>,
    /// Kind of the signal each sub-expression raised, if any.
    pub signals: Vec<Option<SignalKind>>,
    pub messages: Vec<String>,
    pub state: DialogueState,
    pub problems: Vec<String>,
}

/// Result of running one dialogue.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DialogueOutcome {
    pub dialogue_id: String,
    pub turns: Vec<TurnRecord>,
    pub conversion_problems: Vec<String>,
    /// Reconciliation diagnostics of every turn.
    pub execution_problems: Vec<String>,
    /// Unexpected fault that ended the dialogue early.
    pub fault: Option<String>,
}

impl DialogueOutcome {
    pub fn new(dialogue_id: impl Into<String>) -> Self {
        Self {
            dialogue_id: dialogue_id.into(),
            ..Self::default()
        }
    }

    pub fn is_good(&self) -> bool {
        self.conversion_problems.is_empty()
            && self.execution_problems.is_empty()
            && self.fault.is_none()
    }

    pub fn expressions(&self) -> impl Iterator<Item = &str> {
        self.turns.iter().map(|t| t.expression.as_str())
    }

    pub fn states(&self) -> impl Iterator<Item = &DialogueState> {
        self.turns.iter().map(|t| &t.state)
    }
}

/// Runs dialogues turn by turn against a datastore.
pub struct Orchestrator<'a> {
    registry: NodeRegistry,
    config: EngineConfig,
    datastore: &'a dyn Datastore,
    source: &'a dyn ExpressionSource,
    availability: Box<dyn AvailabilityCheck + 'a>,
    patch: Option<Patch>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        datastore: &'a dyn Datastore,
        source: &'a dyn ExpressionSource,
        config: EngineConfig,
    ) -> Self {
        Self {
            registry: NodeRegistry::new(),
            config,
            datastore,
            source,
            availability: Box::new(OracleAvailability),
            patch: None,
        }
    }

    pub fn with_patch(mut self, patch: Patch) -> Self {
        self.patch = Some(patch);
        self
    }

    pub fn with_availability(mut self, availability: impl AvailabilityCheck + 'a) -> Self {
        self.availability = Box::new(availability);
        self
    }

    pub fn with_registry(mut self, registry: NodeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A fresh context for one dialogue.
    pub fn context(&self) -> DialogueContext<'_> {
        DialogueContext::new(
            &self.registry,
            self.datastore,
            self.availability.as_ref(),
            &self.config,
        )
    }

    /// Runs every user turn of `dialogue`.
    ///
    /// Signals become agent answers. A conversion failure ends the dialogue
    /// and is recorded as a conversion problem; an unexpected fault ends it
    /// and is recorded as the outcome's fault.
    pub fn run_dialogue(&self, dialogue: &Dialogue) -> DialogueOutcome {
        let mut ctx = self.context();
        let mut outcome = DialogueOutcome::new(dialogue.dialogue_id.clone());
        info!(dialogue = %dialogue.dialogue_id, "dialogue started");

        for index in 0..dialogue.user_turn_count() {
            let turn_id = (index * 2).to_string();
            let expression = match self.turn_expression(dialogue, index) {
                Ok(expression) => expression,
                Err(signal) => {
                    warn!(dialogue = %dialogue.dialogue_id, turn = %turn_id, "{}", signal.message);
                    outcome.conversion_problems.push(signal.message);
                    break;
                }
            };
            let parsed = match parse_expression(&expression) {
                Ok(parsed) => parsed,
                Err(e) => {
                    let signal = Signal::conversion(e.to_string());
                    warn!(dialogue = %dialogue.dialogue_id, turn = %turn_id, "{}", signal.message);
                    outcome.conversion_problems.push(signal.message);
                    break;
                }
            };
            info!(turn = %turn_id, %expression, "turn");

            if self.config.clear_messages_each_turn {
                ctx.clear_messages();
            }
            ctx.set_agent_turn(dialogue.agent_turn(index).map(Turn::agent_turn));

            let mut record = TurnRecord {
                turn_id: turn_id.clone(),
                user_utterance: dialogue
                    .user_turn(index)
                    .map(|t| t.utterance.clone())
                    .unwrap_or_default(),
                agent_utterance: dialogue.agent_turn(index).map(|t| t.utterance.clone()),
                expression,
                answers: Vec::new(),
                signals: Vec::new(),
                messages: Vec::new(),
                state: DialogueState::new(turn_id.clone()),
                problems: Vec::new(),
            };

            let explicit = parsed.is_call_to(ACCEPT) || parsed.is_call_to(REJECT);
            let mut fault = None;
            for sub in parsed.split_continuations() {
                if let Err(e) = self.run_subexpression(&mut ctx, &sub, explicit, &mut record) {
                    fault = Some(e);
                    break;
                }
            }

            record.messages = ctx.messages().iter().map(|(_, m)| m.clone()).collect();
            record.state = DialogueState::collect(&ctx.graph, &ctx.goals, turn_id);
            if let Some(reference) = dialogue.user_turn(index) {
                record.problems = compare_dialogue_state(reference, &record.state, &self.config);
                outcome
                    .execution_problems
                    .extend(record.problems.iter().cloned());
            }
            outcome.turns.push(record);

            if let Some(e) = fault {
                warn!(dialogue = %dialogue.dialogue_id, error = %e, "fault during evaluation");
                outcome.fault = Some(e.to_string());
                break;
            }
        }

        info!(
            dialogue = %dialogue.dialogue_id,
            good = outcome.is_good(),
            turns = outcome.turns.len(),
            "dialogue finished"
        );
        outcome
    }

    /// Expression of a user turn, a patch entry taking precedence.
    fn turn_expression(&self, dialogue: &Dialogue, index: usize) -> Result<String, Signal> {
        if let Some(patched) = self
            .patch
            .as_ref()
            .and_then(|p| p.get(&dialogue.dialogue_id, index * 2))
        {
            debug!(dialogue = %dialogue.dialogue_id, turn = index * 2, "using patched expression");
            return Ok(patched.to_string());
        }
        self.source.expression(dialogue, index)
    }

    fn run_subexpression(
        &self,
        ctx: &mut DialogueContext<'_>,
        sub: &Expr,
        explicit: bool,
        record: &mut TurnRecord,
    ) -> Result<(), EngineError> {
        let result = match sub.call_name() {
            Some(name @ (ACCEPT | REJECT)) => match ctx.take_pending_suggestion() {
                Some(suggestion) if name == ACCEPT => run_source(ctx, &suggestion.accept),
                Some(suggestion) => run_source(ctx, &suggestion.reject),
                None => Ok(()),
            },
            _ => {
                if !explicit {
                    apply_implicit_accept(ctx, sub)?;
                }
                execute_expression(ctx, sub).map(|_| ())
            }
        };

        let (answer, kind, suggestion) = match result {
            Ok(()) => (last_goal_text(ctx), None, None),
            Err(Interrupt::Signal(signal)) => {
                debug!(kind = %signal.kind, node = ?signal.node, "signal raised");
                (signal.message, Some(signal.kind), signal.suggestion)
            }
            Err(Interrupt::Fault(e)) => return Err(e),
        };
        ctx.set_pending_suggestion(suggestion);
        record.answers.push(answer);
        record.signals.push(kind);
        Ok(())
    }
}

/// Runs a suggestion branch.
fn run_source(ctx: &mut DialogueContext<'_>, source: &str) -> ExecResult {
    let expr = parse_expression(source)?;
    execute_expression(ctx, &expr).map(|_| ())
}

/// Applies the pending implicit-accept branch before `command` runs, unless
/// `command` revises the same slots itself.
fn apply_implicit_accept(ctx: &mut DialogueContext<'_>, command: &Expr) -> Result<(), EngineError> {
    let Some(Suggestion {
        accept,
        message,
        implicit_accept: true,
        ..
    }) = ctx.pending_suggestion().cloned()
    else {
        return Ok(());
    };
    let Ok(expr) = parse_expression(&accept) else {
        warn!(%accept, "pending suggestion is not a valid expression");
        return Ok(());
    };
    if contradicts(command, &expr) {
        debug!(%accept, "implicit accept skipped");
        return Ok(());
    }

    debug!(%accept, "applying implicit accept");
    match execute_expression(ctx, &expr) {
        Ok(root) => {
            if let Some(message) = message {
                ctx.add_message(root, message);
            }
            Ok(())
        }
        Err(Interrupt::Signal(signal)) => {
            debug!(kind = %signal.kind, "implicit accept raised");
            Ok(())
        }
        Err(Interrupt::Fault(e)) => Err(e),
    }
}

/// True when both are calls to the same revision and set a common slot.
fn contradicts(command: &Expr, accept: &Expr) -> bool {
    match (command.call_name(), accept.call_name()) {
        (Some(a), Some(b)) if a == b && a.starts_with("revise_") => command
            .named_slots()
            .any(|slot| accept.named_slots().any(|s| s == slot)),
        _ => false,
    }
}

fn last_goal_text(ctx: &DialogueContext<'_>) -> String {
    ctx.goals
        .last()
        .map(|goal| nodes::describe(&ctx.graph, goal))
        .unwrap_or_default()
}
