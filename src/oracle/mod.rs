//! The reference agent turn ("oracle") and its structured dialog acts.

use crate::schema::Domain;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Dialog acts keyed by `"<Domain>-<Type>"`, each a list of `(slot, value)` pairs.
pub type DialogActs = IndexMap<String, Vec<(String, String)>>;

/// What the reference agent said and did in one turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentTurn {
    pub utterance: String,
    #[serde(default)]
    pub acts: DialogActs,
}

impl AgentTurn {
    pub fn new(utterance: impl Into<String>) -> Self {
        Self {
            utterance: utterance.into(),
            acts: DialogActs::new(),
        }
    }

    /// Adds one act, e.g. `with_act("Hotel-Recommend", &[("name", "acorn guest house")])`.
    pub fn with_act(mut self, label: &str, pairs: &[(&str, &str)]) -> Self {
        self.acts.entry(label.to_string()).or_default().extend(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        self
    }

    /// Acts split into `(domain label, act type, pairs)`.
    pub fn acts(&self) -> impl Iterator<Item = (&str, &str, &[(String, String)])> {
        self.acts.iter().filter_map(|(label, pairs)| {
            label
                .split_once('-')
                .map(|(dom, typ)| (dom, typ, pairs.as_slice()))
        })
    }
}

/// What the agent reported about a search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchActs {
    /// Informed values; recommendations are stored as `rec_<slot>`, booked names as `book_name`.
    pub inform: IndexMap<String, Vec<String>>,
    /// Slots the agent asked the user to narrow down.
    pub request: IndexMap<String, String>,
}

impl SearchActs {
    pub fn parse(turn: &AgentTurn, domain: Domain) -> Self {
        let mut acts = Self::default();
        for (dom, typ, pairs) in turn.acts() {
            if dom == "Booking" {
                if domain.booked_name_acts().contains(&typ) {
                    for (_, v) in pairs.iter().filter(|(k, _)| k == "name") {
                        acts.inform
                            .entry("book_name".to_string())
                            .or_default()
                            .push(v.clone());
                    }
                }
            } else if dom == domain.title() {
                match typ {
                    "Inform" | "Recommend" => {
                        for (k, v) in pairs {
                            let key = if typ == "Recommend" {
                                format!("rec_{}", k)
                            } else {
                                k.clone()
                            };
                            acts.inform.entry(key).or_default().push(v.clone());
                        }
                    }
                    "Request" => {
                        for (k, v) in pairs {
                            acts.request.insert(k.clone(), v.clone());
                        }
                    }
                    _ => {}
                }
            }
        }
        acts
    }

    pub fn is_empty(&self) -> bool {
        self.inform.is_empty() && self.request.is_empty()
    }
}

/// What the agent reported about a booking attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingActs {
    pub inform: IndexMap<String, String>,
    pub book: IndexMap<String, String>,
    pub request: IndexMap<String, String>,
    pub nobook: bool,
}

impl BookingActs {
    pub fn parse(turn: &AgentTurn, domain: Domain) -> Self {
        let relevant = |k: &str| k == "ref" || domain.booking_schema().contains(k);
        let mut acts = Self::default();
        for (dom, typ, pairs) in turn.acts() {
            if dom != "Booking" && dom != domain.title() {
                continue;
            }
            let target = match typ {
                "Inform" => &mut acts.inform,
                "Book" => &mut acts.book,
                "Request" => &mut acts.request,
                "NoBook" => {
                    acts.nobook = true;
                    continue;
                }
                _ => continue,
            };
            for (k, v) in pairs.iter().filter(|(k, _)| relevant(k.as_str())) {
                target.insert(k.clone(), v.clone());
            }
        }
        acts
    }

    /// Confirmation reference given by the agent.
    pub fn reference(&self) -> Option<&str> {
        self.book.get("ref").map(String::as_str)
    }
}
