//! Dataflow evaluation of turn expressions.
//!
//! Evaluation is split in two steps: [`transform`] attaches a freshly built
//! expression to the dialogue's live tasks, and [`evaluate`] runs it. Signals
//! raised by nodes come back as `Err(Interrupt::Signal(..))`.

mod engine;

use crate::dialogue::DialogueContext;
use crate::error::{ExecResult, GraphError};
use crate::expression::Expr;
use crate::graph::{NodeId, NodeKind, duplicate_subgraph};
use crate::nodes::{BookInfoNode, BookTask, FindTask};
use crate::schema::Domain;
use engine::DataflowEngine;
use tracing::debug;

/// Runs the subgraph under `root`, inputs first, following result edges.
pub fn evaluate(ctx: &mut DialogueContext<'_>, root: NodeId) -> ExecResult {
    DataflowEngine::new(ctx).evaluate(root)
}

/// Builds, attaches and evaluates one sub-expression; returns its root.
pub fn execute_expression(ctx: &mut DialogueContext<'_>, expr: &Expr) -> ExecResult<NodeId> {
    let root = ctx.build(expr)?;
    let root = transform(ctx, root)?;
    debug!(%root, expression = %expr, "evaluating");
    evaluate(ctx, root)?;
    Ok(root)
}

/// Structural transforms applied to a new expression root before evaluation.
///
/// A booking becomes the domain's live goal. A standalone search either
/// replaces the search of the domain's live task or is wrapped in a new
/// booking task, so that a later booking request finds it.
pub fn transform(ctx: &mut DialogueContext<'_>, root: NodeId) -> Result<NodeId, GraphError> {
    match ctx.graph.kind(root) {
        NodeKind::Book(task) => {
            wrap_booked_entity(ctx, root, task.domain);
            ctx.goals.register(&ctx.graph, root);
            Ok(root)
        }
        NodeKind::Find(task) => attach_search(ctx, root, task.domain),
        _ => Ok(root),
    }
}

/// A booking given a constraint entity directly books the result of a search
/// on it, so the entity is moved under a new Find.
fn wrap_booked_entity(ctx: &mut DialogueContext<'_>, book: NodeId, domain: Domain) {
    let slot = domain.as_str();
    let Some(entity) = ctx.graph.input(book, slot) else {
        return;
    };
    if let NodeKind::Entity(_) = ctx.graph.kind(entity) {
        let find = ctx.graph.add(NodeKind::Find(FindTask { domain }));
        ctx.graph.connect(find, slot, entity);
        ctx.graph.connect(book, slot, find);
        debug!(%book, %find, "wrapped booked entity in a search");
    }
}

fn attach_search(
    ctx: &mut DialogueContext<'_>,
    find: NodeId,
    domain: Domain,
) -> Result<NodeId, GraphError> {
    let slot = domain.as_str();
    let Some(task) = ctx.goals.task_root(&ctx.graph, domain) else {
        let book_info = ctx.graph.add(NodeKind::BookInfo(BookInfoNode { domain }));
        let book = ctx.graph.add(NodeKind::Book(BookTask { domain }));
        ctx.graph.connect(book, slot, find);
        ctx.graph.connect(book, "book_info", book_info);
        ctx.goals.register(&ctx.graph, book);
        debug!(%domain, %find, %book, "wrapped standalone search");
        return Ok(find);
    };

    let old = ctx
        .graph
        .find_in(task, false, |k| k == NodeKind::Find(FindTask { domain }))
        .ok_or_else(|| GraphError::MissingInput {
            node: task,
            slot: slot.to_string(),
        })?;
    if !ctx.graph.has_input(find, slot) {
        if let Some(constraint) = ctx.graph.input(old, slot) {
            ctx.graph.connect(find, slot, constraint);
        }
    }
    let new_root = duplicate_subgraph(&mut ctx.graph, task, old, find)?;
    ctx.goals.register(&ctx.graph, new_root);
    debug!(%domain, %find, %new_root, "replaced search of live task");
    Ok(find)
}
