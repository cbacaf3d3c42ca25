use crate::error::ExpressionError;
use crate::nodes::{
    BookInfoNode, BookTask, ConfirmationNode, EntityNode, FindTask, NodeBehavior, Passive,
    ReviseTask, SuggestTask,
};
use crate::schema::{Domain, SlotSchema};

static PASSIVE: Passive = Passive;

/// The closed set of node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Literal leaf.
    Str,
    /// `Name(x)`: a name value.
    Name,
    /// `LIKE(x)`: fuzzy match wrapper.
    Like,
    /// `Clear()`: drops a slot during revision.
    Clear,
    NoOp,
    Entity(EntityNode),
    BookInfo(BookInfoNode),
    Find(FindTask),
    Book(BookTask),
    Confirmation(ConfirmationNode),
    Revise(ReviseTask),
    Suggest(SuggestTask),
}

impl NodeKind {
    /// The capability implementation for this variant.
    pub fn behavior(&self) -> &dyn NodeBehavior {
        match self {
            NodeKind::Entity(n) => n,
            NodeKind::BookInfo(n) => n,
            NodeKind::Find(n) => n,
            NodeKind::Book(n) => n,
            NodeKind::Confirmation(n) => n,
            NodeKind::Revise(n) => n,
            NodeKind::Suggest(n) => n,
            NodeKind::Str | NodeKind::Name | NodeKind::Like | NodeKind::Clear | NodeKind::NoOp => {
                &PASSIVE
            }
        }
    }

    pub fn domain(&self) -> Option<Domain> {
        match self {
            NodeKind::Entity(n) => Some(n.domain),
            NodeKind::BookInfo(n) => Some(n.domain),
            NodeKind::Find(n) => Some(n.domain),
            NodeKind::Book(n) => Some(n.domain),
            NodeKind::Confirmation(n) => Some(n.domain),
            NodeKind::Revise(n) => Some(n.domain),
            NodeKind::Suggest(n) => Some(n.domain),
            _ => None,
        }
    }

    /// Constructor name as written in expressions.
    pub fn type_name(&self) -> String {
        match self {
            NodeKind::Str => "Str".to_string(),
            NodeKind::Name => "Name".to_string(),
            NodeKind::Like => "LIKE".to_string(),
            NodeKind::Clear => "Clear".to_string(),
            NodeKind::NoOp => "no_op".to_string(),
            NodeKind::Entity(n) if n.constraint => format!("{}?", n.domain.title()),
            NodeKind::Entity(n) => n.domain.title().to_string(),
            NodeKind::BookInfo(n) => format!("{}BookInfo", n.domain.title()),
            NodeKind::Find(n) => format!("Find{}", n.domain.title()),
            NodeKind::Book(n) => format!("Book{}", n.domain.title()),
            NodeKind::Confirmation(n) => format!("Book{}Confirmation", n.domain.title()),
            NodeKind::Revise(n) => format!("revise_{}", n.domain),
            NodeKind::Suggest(n) => format!("suggest_{}", n.domain),
        }
    }

    /// Slots bound by positional arguments, in order.
    pub fn positional_slots(&self) -> Vec<&'static str> {
        match self {
            NodeKind::Name | NodeKind::Like => vec!["pos1"],
            NodeKind::Find(n) => vec![n.domain.as_str()],
            NodeKind::Book(n) => vec![n.domain.as_str(), "book_info"],
            NodeKind::Confirmation(n) => vec![n.domain.as_str(), "book_info"],
            NodeKind::Suggest(_) => vec!["name"],
            _ => Vec::new(),
        }
    }

    /// Checks that an expression may set `slot` on this node type.
    pub fn check_slot(&self, slot: &str) -> Result<(), ExpressionError> {
        let accepted = match self {
            NodeKind::Entity(n) => return self.check_schema(n.domain.constraint_schema(), slot),
            NodeKind::BookInfo(n) => return self.check_schema(n.domain.booking_schema(), slot),
            NodeKind::Confirmation(n) => {
                let schema = n.domain.confirmation_schema();
                if schema.contains(slot) {
                    return self.check_schema(schema, slot);
                }
                slot == n.domain.as_str() || slot == "book_info"
            }
            NodeKind::Revise(n) => {
                n.domain.constraint_schema().contains(slot)
                    || n.domain.booking_schema().contains(slot)
            }
            _ => self.positional_slots().contains(&slot),
        };
        if accepted {
            Ok(())
        } else {
            Err(self.unknown_slot(slot))
        }
    }

    fn check_schema(&self, schema: SlotSchema, slot: &str) -> Result<(), ExpressionError> {
        match schema.get(slot) {
            Some(spec) if spec.derived => Err(ExpressionError::DerivedSlot {
                node_type: self.type_name(),
                slot: slot.to_string(),
            }),
            Some(_) => Ok(()),
            None => Err(self.unknown_slot(slot)),
        }
    }

    fn unknown_slot(&self, slot: &str) -> ExpressionError {
        ExpressionError::UnknownSlot {
            node_type: self.type_name(),
            slot: slot.to_string(),
        }
    }
}
