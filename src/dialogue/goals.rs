use crate::graph::{Graph, NodeId, NodeKind};
use crate::nodes::FindTask;
use crate::schema::Domain;
use std::ops::Deref;

/// Ordered top-level task roots of the current dialogue.
///
/// At most one root per domain task is live: registering a new version of a
/// task replaces the previous one and moves the task to the end.
#[derive(Debug, Clone, Default)]
pub struct GoalStack {
    roots: Vec<NodeId>,
}

impl GoalStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `root`; registering a root twice has no effect.
    pub fn register(&mut self, graph: &Graph, root: NodeId) {
        if self.roots.contains(&root) {
            return;
        }
        if let Some(domain) = task_domain(graph, root) {
            self.roots
                .retain(|goal| task_domain(graph, *goal) != Some(domain));
        }
        self.roots.push(root);
    }

    /// The most recent root containing a search of `domain`.
    pub fn task_root(&self, graph: &Graph, domain: Domain) -> Option<NodeId> {
        self.roots.iter().rev().copied().find(|root| {
            graph
                .find_in(*root, false, |k| k == NodeKind::Find(FindTask { domain }))
                .is_some()
        })
    }

    pub fn last(&self) -> Option<NodeId> {
        self.roots.last().copied()
    }
}

impl Deref for GoalStack {
    type Target = [NodeId];

    fn deref(&self) -> &Self::Target {
        &self.roots
    }
}

/// Domain of the task rooted at `root`, if it is a search or booking task.
fn task_domain(graph: &Graph, root: NodeId) -> Option<Domain> {
    match graph.kind(root) {
        NodeKind::Book(task) => Some(task.domain),
        NodeKind::Find(task) => Some(task.domain),
        _ => None,
    }
}
