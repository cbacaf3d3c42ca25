//! Tests for comparing engine state with reference annotations.
use pretty_assertions::assert_eq;
use turnflow::dialogue::compare_dialogue_state;
use turnflow::prelude::*;

fn state(turn_id: &str, slots: &[(&str, &str)]) -> DialogueState {
    let mut state = DialogueState::new(turn_id);
    for (slot, value) in slots {
        state.set(*slot, vec![value.to_string()]);
    }
    state
}

fn reference(turn_id: &str, service: &str, slots: &[(&str, &[&str])]) -> Turn {
    Turn::user(turn_id, "").with_state(service, &format!("find_{}", service), slots)
}

#[cfg(test)]
mod reconcile_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_matching_state() {
        let problems = compare_dialogue_state(
            &reference("4", "hotel", &[("hotel-area", &["north"]), ("hotel-stars", &["4"])]),
            &state("4", &[("hotel-area", "north"), ("hotel-stars", "4"), ("hotel-type", "hotel")]),
            &EngineConfig::default(),
        );
        assert!(problems.is_empty(), "{:?}", problems);
    }

    #[test]
    fn test_slot_not_found() {
        let problems = compare_dialogue_state(
            &reference("2", "hotel", &[("hotel-parking", &["yes"])]),
            &state("2", &[]),
            &EngineConfig::default(),
        );
        assert_eq!(
            problems,
            ["2 <SLOT NOT FOUND> Service: hotel, Turn: 2, slot \"hotel-parking\" not found in DF state"]
        );
    }

    #[test]
    fn test_wrong_value_lists_alternatives() {
        let problems = compare_dialogue_state(
            &reference("0", "restaurant", &[("restaurant-food", &["thai", "asian oriental"])]),
            &state("0", &[("restaurant-food", "chinese")]),
            &EngineConfig::default(),
        );
        assert_eq!(
            problems,
            [
                "0 <WRONG SLOT VALUE> Service: restaurant: value \"chinese\" for slot \"restaurant-food\" at turn 0 not in the list of possible values: [\"thai\", \"asian oriental\"]"
            ]
        );
    }

    #[test]
    fn test_dontcare_needs_only_presence() {
        let reference = reference("0", "hotel", &[("hotel-parking", &["dontcare"])]);
        let config = EngineConfig::default();

        assert!(compare_dialogue_state(&reference, &state("0", &[("hotel-parking", "no")]), &config).is_empty());
        assert_eq!(compare_dialogue_state(&reference, &state("0", &[]), &config).len(), 1);
    }

    #[test]
    fn test_names_match_leniently() {
        let problems = compare_dialogue_state(
            &reference("0", "hotel", &[("hotel-name", &["the acorn"])]),
            &state("0", &[("hotel-name", "acorn guest house")]),
            &EngineConfig::default(),
        );
        assert!(problems.is_empty(), "{:?}", problems);

        let problems = compare_dialogue_state(
            &reference("0", "hotel", &[("hotel-name", &["the lensfield hotel"])]),
            &state("0", &[("hotel-name", "ashley hotel")]),
            &EngineConfig::default(),
        );
        assert_eq!(problems.len(), 1);
    }

    #[test]
    fn test_times_are_normalized() {
        let problems = compare_dialogue_state(
            &reference("0", "taxi", &[("taxi-arriveby", &["lunch"]), ("taxi-leaveat", &["9.30"])]),
            &state("0", &[("taxi-arriveby", "12:00"), ("taxi-leaveat", "09:30")]),
            &EngineConfig::default(),
        );
        assert!(problems.is_empty(), "{:?}", problems);
    }

    #[test]
    fn test_train_time_leeway() {
        let reference = reference(
            "6",
            "train",
            &[("train-leaveat", &["10:00"]), ("train-arriveby", &["18:00"])],
        );
        let engine = state(
            "6",
            &[
                ("train-trainid", "TR1234"),
                ("train-leaveat", "10:15"),
                ("train-arriveby", "17:45"),
            ],
        );

        let config = EngineConfig::default();
        assert!(compare_dialogue_state(&reference, &engine, &config).is_empty());

        let strict = EngineConfig::default().with_train_time_leeway(false);
        assert_eq!(compare_dialogue_state(&reference, &engine, &strict).len(), 2);

        let early = state(
            "6",
            &[
                ("train-trainid", "TR1234"),
                ("train-leaveat", "09:45"),
                ("train-arriveby", "17:45"),
            ],
        );
        assert_eq!(compare_dialogue_state(&reference, &early, &config).len(), 1);
    }

    #[test]
    fn test_turn_id_mismatch() {
        let problems = compare_dialogue_state(
            &reference("4", "hotel", &[]),
            &state("2", &[]),
            &EngineConfig::default(),
        );
        assert_eq!(
            problems,
            ["<TURN ID MISMATCH> Turn id 4 from the reference does not match turn id 2 from the engine"]
        );
    }

    #[test]
    fn test_inactive_frames_and_requests_are_skipped() {
        let inactive = Turn::user("0", "").with_state("hotel", "NONE", &[("hotel-area", &["west"])]);
        let requests = reference("0", "hotel", &[("hotel-request-phone", &["?"])]);
        let engine = state("0", &[("hotel-request-phone", "01223 000000")]);
        let config = EngineConfig::default();

        assert!(compare_dialogue_state(&inactive, &state("0", &[]), &config).is_empty());
        assert!(compare_dialogue_state(&requests, &state("0", &[]), &config).is_empty());
        assert!(compare_dialogue_state(&requests, &engine, &config).is_empty());
    }

    #[test]
    fn test_empty_engine_value_passes() {
        let mut engine = DialogueState::new("0");
        engine.set("hotel-area", Vec::new());
        let problems = compare_dialogue_state(
            &reference("0", "hotel", &[("hotel-area", &["north"])]),
            &engine,
            &EngineConfig::default(),
        );
        assert!(problems.is_empty());
    }
}
