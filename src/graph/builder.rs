use super::{Graph, NodeId, NodeKind};
use crate::error::ExpressionError;
use crate::expression::{Arg, Expr};
use crate::nodes::{
    BookInfoNode, BookTask, ConfirmationNode, EntityNode, FindTask, ReviseTask, SuggestTask,
};
use crate::schema::Domain;
use ahash::AHashMap;

/// Maps constructor names used in expressions to node kinds.
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    types: AHashMap<String, NodeKind>,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRegistry {
    /// Creates a registry holding every built-in node type.
    pub fn new() -> Self {
        let mut registry = Self {
            types: AHashMap::new(),
        };
        registry.register_default_types();
        registry
    }

    /// Registers an additional constructor name, e.g. an alias used by a converter.
    pub fn register(&mut self, name: impl Into<String>, kind: NodeKind) {
        self.types.insert(name.into(), kind);
    }

    pub fn get(&self, name: &str) -> Option<NodeKind> {
        self.types.get(name).copied()
    }

    fn register_default_types(&mut self) {
        for kind in [NodeKind::Name, NodeKind::Like, NodeKind::Clear, NodeKind::NoOp] {
            self.register(kind.type_name(), kind);
        }
        for domain in Domain::ALL {
            let kinds = [
                NodeKind::Entity(EntityNode::constraint(domain)),
                NodeKind::Entity(EntityNode::concrete(domain)),
                NodeKind::BookInfo(BookInfoNode { domain }),
                NodeKind::Find(FindTask { domain }),
                NodeKind::Book(BookTask { domain }),
                NodeKind::Confirmation(ConfirmationNode { domain }),
                NodeKind::Revise(ReviseTask { domain }),
                NodeKind::Suggest(SuggestTask { domain }),
            ];
            for kind in kinds {
                self.register(kind.type_name(), kind);
            }
        }
    }
}

/// Builds graph nodes from a parsed expression.
pub struct GraphBuilder<'a> {
    graph: &'a mut Graph,
    registry: &'a NodeRegistry,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(graph: &'a mut Graph, registry: &'a NodeRegistry) -> Self {
        Self { graph, registry }
    }

    /// Recursively creates the nodes for `expr`, children first, and returns its root.
    pub fn build(&mut self, expr: &Expr) -> Result<NodeId, ExpressionError> {
        let (name, args) = match expr {
            Expr::Literal(value) => return Ok(self.graph.add_str(value.clone())),
            Expr::Call { name, args } => (name, args),
        };

        let kind = self
            .registry
            .get(name)
            .ok_or_else(|| ExpressionError::UnknownNodeType(name.clone()))?;
        let bound = self.bind_slots(kind, args)?;

        let mut children = Vec::with_capacity(bound.len());
        for (slot, value) in bound {
            children.push((slot, self.build(value)?));
        }

        let id = self.graph.add(kind);
        for (slot, child) in children {
            self.graph.connect(id, &slot, child);
        }
        Ok(id)
    }

    /// Resolves positional arguments to slot names and validates every slot.
    fn bind_slots<'e>(
        &self,
        kind: NodeKind,
        args: &'e [Arg],
    ) -> Result<Vec<(String, &'e Expr)>, ExpressionError> {
        let positional = kind.positional_slots();
        let mut position = 0;
        let mut bound: Vec<(String, &'e Expr)> = Vec::with_capacity(args.len());
        for arg in args {
            let slot = match &arg.slot {
                Some(slot) => slot.clone(),
                None => {
                    let slot = positional.get(position).ok_or_else(|| {
                        ExpressionError::TooManyPositional {
                            node_type: kind.type_name(),
                            max: positional.len(),
                            found: args.iter().filter(|a| a.slot.is_none()).count(),
                        }
                    })?;
                    position += 1;
                    slot.to_string()
                }
            };
            kind.check_slot(&slot)?;
            if bound.iter().any(|(s, _)| *s == slot) {
                return Err(ExpressionError::DuplicateSlot {
                    node_type: kind.type_name(),
                    slot,
                });
            }
            bound.push((slot, &arg.value));
        }
        Ok(bound)
    }
}
