//! # turnflow - Dialogue Turn Execution Engine
//!
//! **turnflow** executes task-oriented hotel and restaurant dialogues. Each user
//! turn arrives as a small program expression, e.g.
//! `BookHotel(hotel=FindHotel(Hotel?(area=north)), book_info=HotelBookInfo(bookday=friday))`,
//! which is added to a per-dialogue dataflow graph and evaluated against a
//! datastore. Nodes answer the user by raising signals (a missing booking
//! slot, an ambiguous search, ...), and the dialogue state collected after
//! every turn is compared with the reference annotation.
//!
//! ## Core Workflow
//!
//! 1.  **Load Data**: a datastore ([`datastore::InMemoryDatastore`]) and MultiWOZ
//!     style dialogues ([`dialogue::Dialogue`]).
//! 2.  **Pick an Expression Source**: expressions annotated on the turns
//!     ([`dialogue::AnnotatedExpressions`]) or a script ([`dialogue::ScriptedSource`]),
//!     optionally overridden by a [`dialogue::Patch`].
//! 3.  **Run**: an [`dialogue::Orchestrator`] evaluates the turns of a dialogue;
//!     [`dialogue::run_batch`] runs many of them.
//! 4.  **Report**: [`report::ReportFormatter`] renders the outcomes.
//!
//! Later turns may revise earlier constraints with `revise_hotel(..)` and
//! `revise_restaurant(..)`; revisions never modify existing nodes but copy the
//! changed path of the task graph, so older turns stay inspectable.
//!
//! ## Quick Start
//!
//! ```rust
//! use turnflow::prelude::*;
//!
//! let datastore = InMemoryDatastore::new()
//!     .with_row(Domain::Hotel, &[("name", "acorn guest house"), ("area", "north"), ("type", "guesthouse")])
//!     .with_row(Domain::Hotel, &[("name", "ashley hotel"), ("area", "north"), ("type", "hotel")]);
//!
//! let source = ScriptedSource::new().with_script(
//!     "demo",
//!     ["FindHotel(Hotel?(area=north))", "revise_hotel(area=north, type=hotel)"],
//! );
//! let dialogue = Dialogue::new("demo", &["hotel"])
//!     .with_turn(Turn::user("0", "I need a hotel in the north"))
//!     .with_turn(Turn::system("1", "Guesthouse or hotel?"))
//!     .with_turn(Turn::user("2", "A hotel please"))
//!     .with_turn(Turn::system("3", "Ashley hotel is available."));
//!
//! let orchestrator = Orchestrator::new(&datastore, &source, EngineConfig::default());
//! let outcome = orchestrator.run_dialogue(&dialogue);
//!
//! assert_eq!(outcome.turns[0].answers, ["Multiple (2) matches found. Maybe select type?"]);
//! assert_eq!(outcome.turns[1].state.first("hotel-name"), Some("ashley hotel"));
//! ```

pub mod config;
pub mod datastore;
pub mod dialogue;
pub mod error;
pub mod evaluator;
pub mod expression;
pub mod graph;
pub mod matching;
pub mod nodes;
pub mod oracle;
pub mod prelude;
pub mod report;
pub mod schema;
pub mod signal;
