use super::{SlotSchema, SlotSpec, SlotType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const HOTEL_SLOTS: &[SlotSpec] = &[
    SlotSpec::new("address", SlotType::Text),
    SlotSpec::new("area", SlotType::Area),
    SlotSpec::new("internet", SlotType::YesNo),
    SlotSpec::new("parking", SlotType::YesNo),
    SlotSpec::new("name", SlotType::Name),
    SlotSpec::new("phone", SlotType::Text),
    SlotSpec::new("postcode", SlotType::Text),
    SlotSpec::new("pricerange", SlotType::PriceRange),
    SlotSpec::new("stars", SlotType::Stars),
    SlotSpec::new("takesbookings", SlotType::YesNo),
    SlotSpec::new("type", SlotType::Kind),
];

const RESTAURANT_SLOTS: &[SlotSpec] = &[
    SlotSpec::new("name", SlotType::Name),
    SlotSpec::new("food", SlotType::Food),
    SlotSpec::new("type", SlotType::Kind),
    SlotSpec::new("area", SlotType::Area),
    SlotSpec::new("pricerange", SlotType::PriceRange),
    SlotSpec::new("address", SlotType::Text),
    SlotSpec::new("phone", SlotType::Text),
    SlotSpec::new("postcode", SlotType::Text),
];

const HOTEL_BOOKING_SLOTS: &[SlotSpec] = &[
    SlotSpec::new("bookday", SlotType::Day),
    SlotSpec::new("bookpeople", SlotType::Count),
    SlotSpec::new("bookstay", SlotType::Count),
];

const RESTAURANT_BOOKING_SLOTS: &[SlotSpec] = &[
    SlotSpec::new("bookday", SlotType::Day),
    SlotSpec::new("bookpeople", SlotType::Count),
    SlotSpec::new("booktime", SlotType::Time),
];

const CONFIRMATION_SLOTS: &[SlotSpec] = &[SlotSpec::derived("conf_code", SlotType::Code)];

/// A task domain with its own datastore table, schemas and message templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Hotel,
    Restaurant,
}

impl Domain {
    pub const ALL: [Domain; 2] = [Domain::Hotel, Domain::Restaurant];

    /// Lower-case name, used as slot name, state prefix and table name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Hotel => "hotel",
            Domain::Restaurant => "restaurant",
        }
    }

    /// Capitalized name, used in node type names and dialog act labels.
    pub fn title(&self) -> &'static str {
        match self {
            Domain::Hotel => "Hotel",
            Domain::Restaurant => "Restaurant",
        }
    }

    /// Search constraint slots.
    pub fn constraint_schema(&self) -> SlotSchema {
        match self {
            Domain::Hotel => SlotSchema::new(HOTEL_SLOTS),
            Domain::Restaurant => SlotSchema::new(RESTAURANT_SLOTS),
        }
    }

    pub fn booking_schema(&self) -> SlotSchema {
        match self {
            Domain::Hotel => SlotSchema::new(HOTEL_BOOKING_SLOTS),
            Domain::Restaurant => SlotSchema::new(RESTAURANT_BOOKING_SLOTS),
        }
    }

    /// Slots of a confirmation beside its constraint and booking-info references.
    pub fn confirmation_schema(&self) -> SlotSchema {
        SlotSchema::new(CONFIRMATION_SLOTS)
    }

    /// Booking slots a reservation needs, in the order they are asked for,
    /// together with the prompt used when one is missing.
    pub fn required_booking_slots(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Domain::Hotel => &[
                ("bookstay", "For how many days?"),
                ("bookpeople", "For how many people?"),
                ("bookday", "Starting which day?"),
            ],
            Domain::Restaurant => &[
                ("bookday", "On which day would you like to book the restaurant?"),
                ("booktime", "At what time would you like to book the restaurant?"),
                (
                    "bookpeople",
                    "For how many people would you like to book the restaurant?",
                ),
            ],
        }
    }

    /// Fields offered as clarifying questions when a search is ambiguous.
    pub fn search_priority(&self) -> &'static [&'static str] {
        match self {
            Domain::Hotel => &["type", "parking", "internet", "stars", "pricerange"],
            Domain::Restaurant => &["type", "food", "area", "pricerange"],
        }
    }

    /// Changing any of these fields drops a previously chosen name.
    pub fn name_reset_fields(&self) -> &'static [&'static str] {
        match self {
            Domain::Hotel => &["area", "stars", "pricerange", "internet", "parking", "type"],
            Domain::Restaurant => &["area", "type", "pricerange", "food"],
        }
    }

    /// Informed fields whose values are replaced by the values found in the datastore.
    pub fn inform_fields(&self) -> &'static [&'static str] {
        match self {
            Domain::Hotel => &[
                "name", "type", "area", "stars", "address", "phone", "postcode",
            ],
            Domain::Restaurant => &[
                "type", "food", "area", "pricerange", "name", "address", "phone", "postcode",
            ],
        }
    }

    /// Words ignored when comparing names fuzzily.
    pub fn name_exclude_words(&self) -> &'static [&'static str] {
        match self {
            Domain::Hotel => &["hotel", "guesthouse"],
            Domain::Restaurant => &["restaurant"],
        }
    }

    /// Dialog act types of the `Booking` domain that carry the booked name.
    pub fn booked_name_acts(&self) -> &'static [&'static str] {
        match self {
            Domain::Hotel => &["Book"],
            Domain::Restaurant => &["Book", "Inform"],
        }
    }

    pub fn booking_failure_hint(&self) -> &'static str {
        match self {
            Domain::Hotel => "Maybe try another day or length of stay?",
            Domain::Restaurant => "Maybe try another day or time?",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hotel" => Ok(Domain::Hotel),
            "restaurant" => Ok(Domain::Restaurant),
            other => Err(format!("unknown domain '{}'", other)),
        }
    }
}
