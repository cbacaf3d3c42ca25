//! Program expressions: the textual form of one turn's intended action.
//!
//! An expression is a tree of node constructor calls with positional or named
//! arguments, e.g. `BookHotel(hotel=FindHotel(Hotel?(area=north)), book_info=HotelBookInfo())`.

mod parser;

pub use parser::parse_expression;

use std::fmt;

/// Name of the continuation wrapper that joins several sub-expressions in one turn.
pub const CONTINUATION: &str = "cont_turn";

/// A node of a program expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(String),
    Call { name: String, args: Vec<Arg> },
}

/// A call argument, bound by name or by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub slot: Option<String>,
    pub value: Expr,
}

impl Arg {
    pub fn named(slot: impl Into<String>, value: Expr) -> Self {
        Self {
            slot: Some(slot.into()),
            value,
        }
    }

    pub fn positional(value: Expr) -> Self {
        Self { slot: None, value }
    }
}

impl Expr {
    pub fn literal(value: impl Into<String>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn call(name: impl Into<String>, args: Vec<Arg>) -> Self {
        Expr::Call {
            name: name.into(),
            args,
        }
    }

    /// Constructor name of a call, `None` for literals.
    pub fn call_name(&self) -> Option<&str> {
        match self {
            Expr::Call { name, .. } => Some(name),
            Expr::Literal(_) => None,
        }
    }

    pub fn args(&self) -> &[Arg] {
        match self {
            Expr::Call { args, .. } => args,
            Expr::Literal(_) => &[],
        }
    }

    /// Names of the slots this call sets explicitly.
    pub fn named_slots(&self) -> impl Iterator<Item = &str> {
        self.args().iter().filter_map(|a| a.slot.as_deref())
    }

    pub fn is_call_to(&self, name: &str) -> bool {
        self.call_name() == Some(name)
    }

    /// Splits a top-level continuation into its ordered sub-expressions.
    pub fn split_continuations(self) -> Vec<Expr> {
        match self {
            Expr::Call { name, args } if name == CONTINUATION => {
                args.into_iter().flat_map(|a| a.value.split_continuations()).collect()
            }
            other => vec![other],
        }
    }
}

fn is_bare_safe(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| !c.is_whitespace() && !matches!(c, '(' | ')' | ',' | '=' | '"' | '\''))
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) if is_bare_safe(value) => write!(f, "{}", value),
            Expr::Literal(value) if value.contains('"') => write!(f, "'{}'", value),
            Expr::Literal(value) => write!(f, "\"{}\"", value),
            Expr::Call { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if let Some(slot) = &arg.slot {
                        write!(f, "{}=", slot)?;
                    }
                    write!(f, "{}", arg.value)?;
                }
                write!(f, ")")
            }
        }
    }
}
