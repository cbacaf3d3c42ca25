//! Datastore access: typed predicates over per-domain tables of rows.

mod memory;

pub use memory::InMemoryDatastore;

use crate::error::DatastoreError;
use crate::matching::names_match_excluding;
use crate::schema::Domain;
use indexmap::IndexMap;
use itertools::Itertools;

/// One datastore row, `field -> value`.
pub type Row = IndexMap<String, String>;

/// A filter on one row field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive equality.
    Equals { field: String, value: String },
    /// Lenient name match, ignoring `exclude_words` as tokens.
    Like {
        field: String,
        value: String,
        exclude_words: Vec<String>,
    },
}

impl Predicate {
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn like(field: impl Into<String>, value: impl Into<String>, exclude: &[&str]) -> Self {
        Predicate::Like {
            field: field.into(),
            value: value.into(),
            exclude_words: exclude.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Predicate::Equals { field, .. } | Predicate::Like { field, .. } => field,
        }
    }

    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Predicate::Equals { field, value } => row
                .get(field)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case(value.trim())),
            Predicate::Like {
                field,
                value,
                exclude_words,
            } => {
                let exclude: Vec<&str> = exclude_words.iter().map(String::as_str).collect();
                row.get(field)
                    .is_some_and(|v| names_match_excluding(value, v, &exclude))
            }
        }
    }
}

/// The query backend consulted by search nodes.
pub trait Datastore {
    /// All rows of `domain` satisfying every predicate, in table order.
    fn find(&self, domain: Domain, predicates: &[Predicate]) -> Result<Vec<Row>, DatastoreError>;
}

/// Values of `field` across `rows`, without duplicates, in first-seen order.
pub fn collect_values(rows: &[Row], field: &str) -> Vec<String> {
    rows.iter()
        .filter_map(|r| r.get(field))
        .unique()
        .cloned()
        .collect()
}

/// Fields from `priority` whose values differ across `rows`, in priority order.
pub fn differing_fields<'p>(rows: &[Row], priority: &[&'p str]) -> Vec<&'p str> {
    priority
        .iter()
        .copied()
        .filter(|field| collect_values(rows, field).len() > 1)
        .collect()
}
