use super::entity::{BookInfoNode, EntityNode};
use super::suggest::like_name;
use super::{BookTask, FindTask, NodeBehavior, describe};
use crate::dialogue::DialogueContext;
use crate::error::{ExecResult, GraphError};
use crate::graph::{Graph, NodeId, NodeKind, duplicate_subgraph};
use crate::schema::Domain;
use tracing::debug;

/// Returns the live task root of `domain`, creating and registering
/// `Book*(Find*(X?()), book_info=XBookInfo())` when the dialogue has none yet.
pub fn raise_or_create_task(ctx: &mut DialogueContext<'_>, domain: Domain) -> NodeId {
    if let Some(root) = ctx.goals.task_root(&ctx.graph, domain) {
        return root;
    }
    let graph = &mut ctx.graph;
    let constraint = graph.add(NodeKind::Entity(EntityNode::constraint(domain)));
    let find = graph.add(NodeKind::Find(FindTask { domain }));
    graph.connect(find, domain.as_str(), constraint);
    let book_info = graph.add(NodeKind::BookInfo(BookInfoNode { domain }));
    let book = graph.add(NodeKind::Book(BookTask { domain }));
    graph.connect(book, domain.as_str(), find);
    graph.connect(book, "book_info", book_info);
    debug!(%domain, root = %book, "created task root");
    ctx.goals.register(&ctx.graph, book);
    book
}

/// The booking node of a task root.
fn task_book(graph: &Graph, root: NodeId, domain: Domain) -> Result<NodeId, GraphError> {
    graph
        .find_in(root, false, |k| k == NodeKind::Book(BookTask { domain }))
        .ok_or_else(|| GraphError::MissingInput {
            node: root,
            slot: domain.as_str().to_string(),
        })
}

/// Creates a fresh node of `kind` holding only `slots`. `Clear()` values are
/// dropped; a raw name value is wrapped as a fuzzy match.
fn replacement_node(graph: &mut Graph, kind: NodeKind, slots: &[(String, NodeId)]) -> NodeId {
    let mut inputs = Vec::with_capacity(slots.len());
    for (slot, value) in slots {
        match graph.kind(*value) {
            NodeKind::Clear => continue,
            NodeKind::Str | NodeKind::Name if slot == "name" => {
                inputs.push((slot.clone(), like_name(graph, *value)))
            }
            _ => inputs.push((slot.clone(), *value)),
        }
    }
    let node = graph.add(kind);
    for (slot, value) in inputs {
        graph.connect(node, &slot, value);
    }
    node
}

/// Drops the name of a revised constraint when a name-reset field changed
/// with respect to the previous match (or previous constraint).
fn reset_name_on_change(graph: &mut Graph, domain: Domain, old_find: NodeId, new: NodeId) {
    let previous = if graph.is_resolved(old_find) {
        graph.resolve(old_find)
    } else {
        match graph.input(old_find, domain.as_str()) {
            Some(constraint) => constraint,
            None => return,
        }
    };
    if !graph.has_input(previous, "name") || !graph.has_input(new, "name") {
        return;
    }
    let changed = domain.name_reset_fields().iter().any(|field| {
        match (graph.get_dat(new, field), graph.get_dat(previous, field)) {
            (Some(current), Some(before)) => !current.eq_ignore_ascii_case(before),
            (Some(_), None) => true,
            (None, _) => false,
        }
    });
    if changed {
        debug!(%domain, node = %new, "name reset after constraint change");
        graph.disconnect(new, "name");
    }
}

/// True when `live` already carries every revised value, so the revision
/// would not change anything. `Clear()` holds when the slot is absent.
fn holds_values(graph: &Graph, live: Option<NodeId>, slots: &[(String, NodeId)]) -> bool {
    let Some(live) = live else {
        return false;
    };
    slots.iter().all(|(slot, value)| match graph.kind(*value) {
        NodeKind::Clear => !graph.has_input(live, slot),
        _ => match (graph.first_literal(*value), graph.get_dat(live, slot)) {
            (Some(new), Some(current)) => new.trim().eq_ignore_ascii_case(current.trim()),
            _ => false,
        },
    })
}

fn finish(ctx: &mut DialogueContext<'_>, domain: Domain, id: NodeId, root: NodeId) -> ExecResult {
    ctx.graph.set_result(id, root);
    ctx.goals.register(&ctx.graph, root);
    debug!(%domain, node = %id, %root, "revision applied");
    Ok(())
}

/// `revise_<domain>(slot=value, ...)`: applies a partial update to the live task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviseTask {
    pub domain: Domain,
}

impl NodeBehavior for ReviseTask {
    fn execute(&self, ctx: &mut DialogueContext<'_>, id: NodeId) -> ExecResult {
        let domain = self.domain;
        let mut root = raise_or_create_task(ctx, domain);

        let constraint_schema = domain.constraint_schema();
        let booking_schema = domain.booking_schema();
        let (constraint_slots, booking_slots): (Vec<_>, Vec<_>) = ctx
            .graph
            .node(id)
            .inputs()
            .iter()
            .map(|(slot, value)| (slot.clone(), *value))
            .filter(|(slot, _)| constraint_schema.contains(slot) || booking_schema.contains(slot))
            .partition(|(slot, _)| constraint_schema.contains(slot));

        if !constraint_slots.is_empty() {
            let book = task_book(&ctx.graph, root, domain)?;
            let find = ctx
                .graph
                .input(book, domain.as_str())
                .ok_or_else(|| GraphError::MissingInput {
                    node: book,
                    slot: domain.as_str().to_string(),
                })?;
            let old = ctx
                .graph
                .input(find, domain.as_str())
                .ok_or_else(|| GraphError::MissingInput {
                    node: find,
                    slot: domain.as_str().to_string(),
                })?;
            if holds_values(&ctx.graph, Some(old), &constraint_slots) {
                debug!(%domain, node = %id, "constraint already holds the revised values");
            } else {
                let new = replacement_node(
                    &mut ctx.graph,
                    NodeKind::Entity(EntityNode::constraint(domain)),
                    &constraint_slots,
                );
                reset_name_on_change(&mut ctx.graph, domain, find, new);
                root = duplicate_subgraph(&mut ctx.graph, root, old, new)?;
            }
        }

        if !booking_slots.is_empty() {
            let book = task_book(&ctx.graph, root, domain)?;
            let live = ctx.graph.input(book, "book_info");
            if holds_values(&ctx.graph, live, &booking_slots) {
                debug!(%domain, node = %id, "booking details already hold the revised values");
                return finish(ctx, domain, id, root);
            }
            let new = replacement_node(
                &mut ctx.graph,
                NodeKind::BookInfo(BookInfoNode { domain }),
                &booking_slots,
            );
            root = match live {
                Some(old) => duplicate_subgraph(&mut ctx.graph, root, old, new)?,
                None => {
                    let new_book = ctx.graph.duplicate_node(book);
                    ctx.graph.connect(new_book, "book_info", new);
                    duplicate_subgraph(&mut ctx.graph, root, book, new_book)?
                }
            };
        }

        finish(ctx, domain, id, root)
    }

    fn describe(&self, graph: &Graph, id: NodeId) -> String {
        if graph.is_resolved(id) {
            describe(graph, graph.resolve(id))
        } else {
            format!("revise {}", self.domain)
        }
    }
}
