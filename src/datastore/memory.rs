use super::{Datastore, Predicate, Row};
use crate::error::DatastoreError;
use crate::schema::Domain;
use ahash::AHashMap;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

/// A datastore holding every table in memory.
///
/// The JSON form maps a domain name to an array of row objects:
/// `{"hotel": [{"name": "acorn guest house", "area": "north", "stars": 4}], "restaurant": []}`.
/// Scalar values are stored as strings; tables of unknown domains are skipped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatastore {
    tables: AHashMap<Domain, Vec<Row>>,
}

impl InMemoryDatastore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DatastoreError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DatastoreError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> Result<Self, DatastoreError> {
        let raw: AHashMap<String, Vec<Value>> =
            serde_json::from_str(json).map_err(|e| DatastoreError::JsonParseError(e.to_string()))?;

        let mut store = Self::new();
        for (table, rows) in raw {
            let Ok(domain) = table.parse::<Domain>() else {
                warn!(table = %table, "skipping table of unknown domain");
                continue;
            };
            for (index, row) in rows.into_iter().enumerate() {
                let Value::Object(fields) = row else {
                    return Err(DatastoreError::InvalidRow { table, index });
                };
                let row: Row = fields
                    .into_iter()
                    .filter_map(|(k, v)| scalar_to_string(v).map(|s| (k, s)))
                    .collect();
                store.insert(domain, row);
            }
        }
        Ok(store)
    }

    pub fn insert(&mut self, domain: Domain, row: Row) {
        self.tables.entry(domain).or_default().push(row);
    }

    /// Builder-style insertion of a row given as `(field, value)` pairs.
    pub fn with_row(mut self, domain: Domain, fields: &[(&str, &str)]) -> Self {
        let row = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.insert(domain, row);
        self
    }

    pub fn table(&self, domain: Domain) -> &[Row] {
        self.tables.get(&domain).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if b { "yes" } else { "no" }.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl Datastore for InMemoryDatastore {
    fn find(&self, domain: Domain, predicates: &[Predicate]) -> Result<Vec<Row>, DatastoreError> {
        let rows: Vec<Row> = self
            .table(domain)
            .iter()
            .filter(|row| predicates.iter().all(|p| p.matches(row)))
            .cloned()
            .collect();
        debug!(%domain, predicates = predicates.len(), matches = rows.len(), "datastore query");
        Ok(rows)
    }
}
