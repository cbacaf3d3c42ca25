//! Unit tests for individual components.
mod common;
use pretty_assertions::assert_eq;
use turnflow::graph::duplicate_subgraph;
use turnflow::matching::{is_later, names_match, normalize_time, time_values};
use turnflow::prelude::*;

#[cfg(test)]
mod matching_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_names_match() {
        assert!(names_match("Acorn Guest House", "acorn guest house"));
        assert!(names_match("lensfield", "the lensfield hotel"));
        assert!(names_match("the gonville hotel", "gonville"));
        assert!(!names_match("the hotel", "ashley hotel"));
        assert!(!names_match("", "acorn"));
        assert!(names_match("", ""));
    }

    #[test]
    fn test_time_values() {
        assert_eq!(time_values("18:30"), Some((18, 30)));
        assert_eq!(time_values("9.05"), Some((9, 5)));
        assert_eq!(time_values("1745"), Some((17, 45)));
        assert_eq!(time_values("Lunch"), Some((12, 0)));
        assert_eq!(time_values("evening"), None);

        assert_eq!(normalize_time("7:15"), "07:15");
        assert_eq!(normalize_time("dontcare"), "dontcare");
    }

    #[test]
    fn test_is_later() {
        assert_eq!(is_later("10:15", "10:00"), Some(true));
        assert_eq!(is_later("10:00", "10:00"), Some(false));
        assert_eq!(is_later("09:00", "lunch"), Some(false));
        assert_eq!(is_later("soon", "10:00"), None);
    }
}

#[cfg(test)]
mod schema_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_domain_names() {
        assert_eq!(Domain::Hotel.as_str(), "hotel");
        assert_eq!(Domain::Restaurant.title(), "Restaurant");
        assert_eq!("HOTEL".parse::<Domain>(), Ok(Domain::Hotel));
        assert!("train".parse::<Domain>().is_err());
    }

    #[test]
    fn test_schemas() {
        let hotel = Domain::Hotel.constraint_schema();
        assert!(hotel.contains("stars"));
        assert!(!hotel.contains("food"));
        assert_eq!(hotel.len(), 11);

        let restaurant = Domain::Restaurant.booking_schema();
        let names: Vec<&str> = restaurant.names().collect();
        assert_eq!(names, ["bookday", "bookpeople", "booktime"]);

        let confirmation = Domain::Hotel.confirmation_schema();
        assert!(confirmation.get("conf_code").is_some_and(|s| s.derived));
    }

    #[test]
    fn test_required_booking_slots_follow_prompt_order() {
        let slots: Vec<&str> = Domain::Hotel
            .required_booking_slots()
            .iter()
            .map(|(slot, _)| *slot)
            .collect();
        assert_eq!(slots, ["bookstay", "bookpeople", "bookday"]);
    }
}

#[cfg(test)]
mod graph_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_result_edges() {
        let mut graph = Graph::new();
        let a = graph.add(NodeKind::NoOp);
        let b = graph.add(NodeKind::NoOp);
        let c = graph.add_str("value");

        assert!(!graph.is_resolved(a));
        assert_eq!(graph.resolve(a), a);

        graph.set_result(a, b);
        graph.set_result(b, c);
        assert_eq!(graph.resolve(a), c);
        assert_eq!(graph.value(graph.resolve(a)), Some("value"));
        assert_eq!(a.to_string(), "#0");
    }

    #[test]
    fn test_duplicate_subgraph_copies_only_the_path() {
        let harness = common::Harness::new();
        let mut ctx = harness.context();
        let book = ctx
            .construct("BookHotel(hotel=FindHotel(Hotel?(area=north)), book_info=HotelBookInfo(bookstay=2))")
            .unwrap();
        let find = ctx.graph.input(book, "hotel").unwrap();
        let constraint = ctx.graph.input(find, "hotel").unwrap();
        let info = ctx.graph.input(book, "book_info").unwrap();
        let before = ctx.graph.len();

        let replacement = ctx.construct("Hotel?(area=south)").unwrap();
        let added = ctx.graph.len() - before;
        let new_book = duplicate_subgraph(&mut ctx.graph, book, constraint, replacement).unwrap();

        // Only the search and the booking are copied.
        assert_eq!(ctx.graph.len(), before + added + 2);
        let new_find = ctx.graph.input(new_book, "hotel").unwrap();
        assert_ne!(new_find, find);
        assert_eq!(ctx.graph.input(new_find, "hotel"), Some(replacement));
        assert_eq!(ctx.graph.input(new_book, "book_info"), Some(info));
        assert_eq!(ctx.graph.node(new_find).duplicate_of(), Some(find));

        assert_eq!(ctx.graph.input(find, "hotel"), Some(constraint));
        assert_eq!(ctx.graph.input(book, "hotel"), Some(find));
    }

    #[test]
    fn test_duplicate_subgraph_requires_reachable_node() {
        let mut graph = Graph::new();
        let root = graph.add(NodeKind::NoOp);
        let stray = graph.add_str("stray");
        let new = graph.add_str("new");
        assert_eq!(
            duplicate_subgraph(&mut graph, root, stray, new),
            Err(GraphError::NotReachable { root, old: stray })
        );
    }

    #[test]
    fn test_replacing_the_root() {
        let mut graph = Graph::new();
        let root = graph.add(NodeKind::NoOp);
        let new = graph.add(NodeKind::NoOp);
        assert_eq!(duplicate_subgraph(&mut graph, root, root, new), Ok(new));
    }
}

#[cfg(test)]
mod datastore_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_from_json() {
        let datastore = InMemoryDatastore::from_json_str(
            r#"{
                "hotel": [
                    {"name": "acorn guest house", "stars": 4, "parking": true, "location": [52.2, 0.1]},
                    {"name": "ashley hotel", "stars": "2", "parking": false}
                ],
                "train": [{"trainid": "TR0001"}]
            }"#,
        )
        .expect("Failed to load datastore");

        let hotels = datastore.table(Domain::Hotel);
        assert_eq!(hotels.len(), 2);
        assert_eq!(hotels[0].get("stars").map(String::as_str), Some("4"));
        assert_eq!(hotels[0].get("parking").map(String::as_str), Some("yes"));
        assert_eq!(hotels[1].get("parking").map(String::as_str), Some("no"));
        assert!(hotels[0].get("location").is_none());
        assert!(datastore.table(Domain::Restaurant).is_empty());
    }

    #[test]
    fn test_invalid_rows() {
        let result = InMemoryDatastore::from_json_str(r#"{"hotel": [{"name": "a"}, "b"]}"#);
        assert!(matches!(
            result,
            Err(DatastoreError::InvalidRow { index: 1, .. })
        ));
        assert!(matches!(
            InMemoryDatastore::from_json_str("[1, 2]"),
            Err(DatastoreError::JsonParseError(_))
        ));
    }

    #[test]
    fn test_predicates() {
        let datastore = common::create_datastore();
        let rows = datastore
            .find(
                Domain::Hotel,
                &[
                    Predicate::equals("area", "NORTH"),
                    Predicate::like("name", "worth", &["hotel", "guesthouse"]),
                ],
            )
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "worth house");
    }
}

#[cfg(test)]
mod loading_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DIALOGUE_JSON: &str = r#"{
        "dialogue_id": "PMUL0001.json",
        "services": ["hotel"],
        "turns": [
            {
                "turn_id": "0",
                "speaker": "USER",
                "utterance": "cheap hotel in the north",
                "frames": [
                    {
                        "service": "hotel",
                        "state": {
                            "active_intent": "find_hotel",
                            "slot_values": {"hotel-area": ["north"]},
                            "requested_slots": []
                        }
                    },
                    {"service": "taxi"}
                ]
            },
            {"turn_id": "1", "speaker": "SYSTEM", "utterance": "Sure.", "frames": []}
        ]
    }"#;

    #[test]
    fn test_load_dialogues() {
        let dialogues = Dialogue::from_json_str(DIALOGUE_JSON).expect("Failed to load");
        assert_eq!(dialogues.len(), 1);
        let dialogue = &dialogues[0];
        assert_eq!(dialogue.short_id(), "PMUL0001");
        assert_eq!(dialogue.user_turn_count(), 1);
        assert_eq!(dialogue.turns[1].speaker, turnflow::dialogue::Speaker::System);
        assert!(dialogue.turns[0].frames[0].state.as_ref().unwrap().is_active());
        assert!(dialogue.turns[0].frames[1].state.is_none());

        let many = Dialogue::from_json_str(&format!("[{}, {}]", DIALOGUE_JSON, DIALOGUE_JSON))
            .expect("Failed to load");
        assert_eq!(many.len(), 2);
    }

    #[test]
    fn test_attach_dialog_acts() {
        let mut dialogues = Dialogue::from_json_str(DIALOGUE_JSON).unwrap();
        attach_dialog_acts(
            &mut dialogues,
            r#"{"PMUL0001.json": {"1": {"dialog_act": {"Hotel-Inform": [["choice", "3"]]}}}}"#,
        )
        .expect("Failed to attach acts");

        let agent_turn = dialogues[0].turns[1].agent_turn();
        assert_eq!(agent_turn.utterance, "Sure.");
        assert_eq!(
            agent_turn.acts["Hotel-Inform"],
            [("choice".to_string(), "3".to_string())]
        );
        assert!(dialogues[0].turns[0].dialog_act.is_none());
    }

    #[test]
    fn test_parse_patch() {
        let patch = Patch::parse(
            "# dialogue turn expression\n\
             PMUL0001.json 0 FindHotel(Hotel?(area=north))\n\
             \n\
             SNG0002 4 revise_hotel(area=north, stars=4)\n",
        )
        .expect("Failed to parse patch");

        assert_eq!(patch.len(), 2);
        assert_eq!(patch.get("PMUL0001", 0), Some("FindHotel(Hotel?(area=north))"));
        assert_eq!(
            patch.get("SNG0002.json", 4),
            Some("revise_hotel(area=north, stars=4)")
        );
        assert_eq!(patch.get("SNG0002.json", 2), None);
    }

    #[test]
    fn test_malformed_patch() {
        assert!(matches!(
            Patch::parse("PMUL0001 0 no_op()\nPMUL0001 2\n"),
            Err(DialogueError::MalformedPatch { line: 2, .. })
        ));
        assert!(Patch::parse("\n# only comments\n").unwrap().is_empty());
    }

    #[test]
    fn test_config_from_json() {
        let config = EngineConfig::from_json_str(
            r#"{"agent_oracle": true, "oracle_only": true, "confirmation_prefix": "REF"}"#,
        )
        .expect("Failed to parse config");
        assert!(config.is_oracle_only());
        assert_eq!(config.confirmation_prefix, "REF");
        assert!(config.clear_messages_each_turn);

        let only = EngineConfig::default().with_oracle_only(true);
        assert!(!only.is_oracle_only());

        assert!(matches!(
            EngineConfig::from_json_str(r#"{"agent_oracle": "yes"}"#),
            Err(ConfigError::JsonParseError(_))
        ));
    }
}
