use super::{NodeBehavior, collect_slots};
use crate::datastore::{Predicate, Row};
use crate::dialogue::DialogueState;
use crate::graph::{Graph, NodeId, NodeKind};
use crate::schema::{Domain, SlotType};

const DONTCARE: [&str; 3] = ["dontcare", "dont care", "don't care"];

fn is_dontcare(value: &str) -> bool {
    DONTCARE.contains(&value.trim().to_lowercase().as_str())
}

/// A hotel or restaurant, either as a search constraint (`Hotel?`) or as a
/// concrete datastore row (`Hotel`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityNode {
    pub domain: Domain,
    pub constraint: bool,
}

impl EntityNode {
    pub const fn constraint(domain: Domain) -> Self {
        Self {
            domain,
            constraint: true,
        }
    }

    pub const fn concrete(domain: Domain) -> Self {
        Self {
            domain,
            constraint: false,
        }
    }

    /// Creates a concrete entity holding the non-derived schema fields of `row`.
    pub fn from_row(graph: &mut Graph, domain: Domain, row: &Row) -> NodeId {
        let fields: Vec<(&str, NodeId)> = domain
            .constraint_schema()
            .iter()
            .filter(|spec| !spec.derived)
            .filter_map(|spec| {
                row.get(spec.name)
                    .filter(|v| !v.is_empty())
                    .map(|v| (spec.name, v.clone()))
            })
            .map(|(name, value)| (name, graph.add_str(value)))
            .collect();
        let id = graph.add(NodeKind::Entity(Self::concrete(domain)));
        for (slot, child) in fields {
            graph.connect(id, slot, child);
        }
        id
    }
}

impl NodeBehavior for EntityNode {
    fn describe(&self, graph: &Graph, id: NodeId) -> String {
        let dat = |slot: &str| graph.get_dat(id, slot).filter(|v| !v.is_empty());
        let mut parts = Vec::new();
        parts.push(match (dat("name"), dat("type")) {
            (Some(name), _) => name.to_string(),
            (None, Some(typ)) => format!("the {}", typ),
            (None, None) => format!("the {}", self.domain),
        });
        match self.domain {
            Domain::Hotel => {
                if let Some(stars) = dat("stars") {
                    parts.push(format!("has {} stars", stars));
                }
                if let Some(area) = dat("area") {
                    parts.push(format!("in the {}", area));
                }
                if let Some(price) = dat("pricerange") {
                    parts.push(format!("{} price range", price));
                }
                if dat("parking").is_some_and(|v| v != "no") {
                    parts.push("with parking".to_string());
                }
                if dat("internet").is_some_and(|v| v != "no") {
                    parts.push("with internet".to_string());
                }
            }
            Domain::Restaurant => {
                if let Some(food) = dat("food") {
                    parts.push(format!("serves {} food", food));
                }
                if let Some(area) = dat("area") {
                    parts.push(format!("in the {}", area));
                }
                if let Some(price) = dat("pricerange") {
                    parts.push(format!("{} price range", price));
                }
                if let Some(address) = dat("address") {
                    parts.push(format!("and is located at {}", address));
                }
            }
        }
        parts.join(", ")
    }

    fn collect_state(&self, graph: &Graph, id: NodeId, state: &mut DialogueState) {
        collect_slots(graph, id, self.domain.as_str(), state);
    }

    fn query_predicates(&self, graph: &Graph, id: NodeId) -> Vec<Predicate> {
        self.domain
            .constraint_schema()
            .iter()
            .filter_map(|spec| {
                let value = graph.get_dat(id, spec.name)?;
                if is_dontcare(value) {
                    return None;
                }
                Some(match spec.ty {
                    SlotType::Name => {
                        Predicate::like(spec.name, value, self.domain.name_exclude_words())
                    }
                    _ => Predicate::equals(spec.name, value),
                })
            })
            .collect()
    }
}

/// Booking details: day, people, stay or time depending on the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookInfoNode {
    pub domain: Domain,
}

impl NodeBehavior for BookInfoNode {
    fn describe(&self, graph: &Graph, id: NodeId) -> String {
        let dat = |slot: &str| graph.get_dat(id, slot);
        let mut parts = Vec::new();
        if let Some(people) = dat("bookpeople") {
            parts.push(format!("for {} people", people));
        }
        if let Some(stay) = dat("bookstay") {
            parts.push(format!("for {} nights", stay));
        }
        match (self.domain, dat("bookday")) {
            (Domain::Hotel, Some(day)) => parts.push(format!("starting {}", day)),
            (Domain::Restaurant, Some(day)) => parts.push(format!("on {}", day)),
            (_, None) => {}
        }
        if let Some(time) = dat("booktime") {
            parts.push(format!("at {}", time));
        }
        parts.join(" ")
    }

    fn collect_state(&self, graph: &Graph, id: NodeId, state: &mut DialogueState) {
        collect_slots(graph, id, self.domain.as_str(), state);
    }
}
