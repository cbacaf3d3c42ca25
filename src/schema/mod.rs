//! Slot schemas for the dialogue domains.
//!
//! A schema is an ordered, immutable list of slots. Node types consult it to
//! validate inputs, partition revisions and order predicates and state slices.

mod domain;

pub use domain::Domain;

use serde::Serialize;

/// Value type expected by a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SlotType {
    Name,
    Text,
    Area,
    PriceRange,
    Stars,
    Kind,
    YesNo,
    Food,
    Day,
    Count,
    Time,
    Code,
}

/// A single slot of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotSpec {
    pub name: &'static str,
    pub ty: SlotType,
    /// Computed by the engine, never supplied in an expression.
    pub derived: bool,
}

impl SlotSpec {
    pub const fn new(name: &'static str, ty: SlotType) -> Self {
        Self {
            name,
            ty,
            derived: false,
        }
    }

    pub const fn derived(name: &'static str, ty: SlotType) -> Self {
        Self {
            name,
            ty,
            derived: true,
        }
    }
}

/// Ordered mapping of slot name to expected type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSchema {
    slots: &'static [SlotSpec],
}

impl SlotSchema {
    pub const fn new(slots: &'static [SlotSpec]) -> Self {
        Self { slots }
    }

    pub fn get(&self, name: &str) -> Option<&'static SlotSpec> {
        self.slots.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static SlotSpec> + use<> {
        self.slots.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + use<> {
        self.slots.iter().map(|s| s.name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
