//! Tests for bookings (`Book*`) and their confirmations.
mod common;
use common::*;
use pretty_assertions::assert_eq;
use turnflow::prelude::*;

const LENSFIELD_FULL: &str = "BookHotel(hotel=FindHotel(Hotel?(name=lensfield)), \
     book_info=HotelBookInfo(bookstay=3, bookpeople=2, bookday=friday))";

#[cfg(test)]
mod booking_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_complete_booking_is_confirmed() {
        let harness = Harness::new();
        let mut ctx = harness.context();

        let book = run(&mut ctx, LENSFIELD_FULL).expect("booking succeeds");
        let find = ctx.graph.input(book, "hotel").expect("search");
        let constraint = ctx.graph.input(find, "hotel").expect("constraint");
        let book_info = ctx.graph.input(book, "book_info").expect("booking details");

        let confirmation = ctx.graph.resolve(book);
        assert_eq!(ctx.graph.kind(confirmation).type_name(), "BookHotelConfirmation");
        assert_eq!(ctx.graph.get_dat(confirmation, "conf_code"), Some("XYZ00001"));
        assert_eq!(ctx.graph.input(confirmation, "hotel"), Some(constraint));
        assert_eq!(ctx.graph.input(confirmation, "book_info"), Some(book_info));

        let messages: Vec<&str> = ctx.messages().iter().map(|(_, m)| m.as_str()).collect();
        assert_eq!(
            messages,
            ["I have made the reservation as requested. Confirmation code is XYZ00001"]
        );
    }

    #[test]
    fn test_confirmation_codes_count_per_dialogue() {
        let harness =
            Harness::with_config(EngineConfig::default().with_confirmation_prefix("TF"));
        let mut ctx = harness.context();

        run(&mut ctx, LENSFIELD_FULL).expect("booking succeeds");
        let book = run(
            &mut ctx,
            "BookRestaurant(restaurant=FindRestaurant(Restaurant?(food=chinese)), \
             book_info=RestaurantBookInfo(bookday=sunday, booktime=18:00, bookpeople=4))",
        )
        .expect("booking succeeds");

        let confirmation = ctx.graph.resolve(book);
        assert_eq!(ctx.graph.get_dat(confirmation, "conf_code"), Some("TF00002"));
        let text = turnflow::nodes::describe(&ctx.graph, confirmation);
        assert!(text.starts_with("Restaurant reservation: golden wok"), "{}", text);
        assert!(text.ends_with("Confirmation code: TF00002"), "{}", text);
    }

    #[test]
    fn test_missing_details_are_asked_in_order() {
        let harness = Harness::new();
        let mut ctx = harness.context();

        let signal = expect_signal(run(
            &mut ctx,
            "BookHotel(hotel=FindHotel(Hotel?(name=lensfield)), book_info=HotelBookInfo(bookpeople=2))",
        ));
        assert_eq!(signal.kind, SignalKind::MissingValue);
        assert_eq!(signal.slot.as_deref(), Some("bookstay"));
        assert!(signal.message.starts_with("OK, lensfield hotel"), "{}", signal.message);
        assert!(signal.message.ends_with(". For how many days?"), "{}", signal.message);

        // The entity is only mentioned once per task.
        let signal = expect_signal(run(&mut ctx, "revise_hotel(bookstay=3)"));
        assert_eq!(signal.slot.as_deref(), Some("bookpeople"));
        assert_eq!(signal.message, "For how many people?");

        let signal = expect_signal(run(&mut ctx, "revise_hotel(bookstay=3, bookpeople=2)"));
        assert_eq!(signal.message, "Starting which day?");

        run(&mut ctx, "revise_hotel(bookstay=3, bookpeople=2, bookday=friday)")
            .expect("booking succeeds");
        let book = ctx.goals.last().expect("live task");
        let confirmation = ctx.graph.resolve(book);
        assert_eq!(ctx.graph.get_dat(confirmation, "conf_code"), Some("XYZ00001"));
    }

    #[test]
    fn test_restaurant_prompts() {
        let harness = Harness::new();
        let mut ctx = harness.context();

        let signal = expect_signal(run(
            &mut ctx,
            "BookRestaurant(restaurant=FindRestaurant(Restaurant?(food=indian)), \
             book_info=RestaurantBookInfo(bookday=monday))",
        ));
        assert_eq!(signal.slot.as_deref(), Some("booktime"));
        assert!(
            signal
                .message
                .ends_with("At what time would you like to book the restaurant?")
        );
    }

    #[test]
    fn test_booking_without_target() {
        let harness = Harness::new();
        let mut ctx = harness.context();

        let signal = expect_signal(run(&mut ctx, "BookHotel()"));
        assert_eq!(signal.kind, SignalKind::MissingValue);
        assert_eq!(signal.slot.as_deref(), Some("hotel"));
        assert_eq!(signal.message, "Please specify what hotel you are looking for");
    }

    #[test]
    fn test_ambiguous_search_stops_booking() {
        let harness = Harness::new();
        let mut ctx = harness.context();

        let signal = expect_signal(run(
            &mut ctx,
            "BookHotel(hotel=FindHotel(Hotel?(area=north)), book_info=HotelBookInfo(bookstay=1))",
        ));
        assert_eq!(signal.kind, SignalKind::MultipleEntriesSingleton);
        let book = ctx.goals.last().expect("live task");
        assert!(!ctx.graph.is_resolved(book));
    }

    #[test]
    fn test_booking_an_unknown_entity_is_not_confirmed() {
        let harness = Harness::new();
        let mut ctx = harness.context();

        let signal = expect_signal(run(
            &mut ctx,
            "BookHotel(hotel=Hotel?(name=nowhere, area=west), \
             book_info=HotelBookInfo(bookstay=2, bookpeople=2, bookday=monday))",
        ));
        assert_eq!(signal.kind, SignalKind::ElementNotFound);
        assert!(ctx.messages().is_empty());

        let book = ctx.goals.last().expect("live task");
        assert!(!ctx.graph.is_resolved(book));
        let find = ctx.graph.input(book, "hotel").expect("search");
        assert_eq!(ctx.graph.kind(find).type_name(), "FindHotel");
    }

    #[test]
    fn test_booked_entity_can_be_revised() {
        let harness = Harness::new();
        let mut ctx = harness.context();

        let signal = expect_signal(run(
            &mut ctx,
            "BookHotel(hotel=Hotel?(name=acorn), book_info=HotelBookInfo(bookstay=2))",
        ));
        assert_eq!(signal.slot.as_deref(), Some("bookpeople"));
        let book = ctx.goals.last().expect("live task");
        let find = ctx.graph.input(book, "hotel").expect("search");
        let constraint = ctx.graph.input(find, "hotel").expect("constraint");

        // Booking details are overwritten, so the stay is asked for again.
        let signal = expect_signal(run(&mut ctx, "revise_hotel(bookpeople=2)"));
        assert_eq!(signal.slot.as_deref(), Some("bookstay"));
        assert_eq!(ctx.goals.len(), 1);

        let book = ctx.goals.last().expect("live task");
        let find = ctx.graph.input(book, "hotel").expect("search");
        assert_eq!(ctx.graph.input(find, "hotel"), Some(constraint));

        let state = DialogueState::collect(&ctx.graph, &ctx.goals, "1");
        assert_eq!(state.first("hotel-name"), Some("acorn guest house"));
        assert_eq!(state.first("hotel-bookpeople"), Some("2"));
    }

    #[test]
    fn test_entity_not_taking_bookings() {
        let harness = Harness::new();
        let mut ctx = harness.context();

        let signal = expect_signal(run(
            &mut ctx,
            "BookHotel(hotel=FindHotel(Hotel?(name=\"university arms\")), \
             book_info=HotelBookInfo(bookstay=1, bookpeople=1, bookday=monday))",
        ));
        assert_eq!(signal.kind, SignalKind::InvalidInput);
        assert!(
            signal
                .message
                .ends_with("Unfortunately the hotel does not take bookings. Maybe try another hotel?"),
            "{}",
            signal.message
        );
    }
}

#[cfg(test)]
mod availability_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct FullyBooked;

    impl AvailabilityCheck for FullyBooked {
        fn check(&self, request: &BookingRequest<'_>) -> Availability {
            match request.graph.get_dat(request.book_info, "bookday") {
                Some("friday") => Availability::Unavailable,
                _ => Availability::Confirmed(Some("OWN42".to_string())),
            }
        }
    }

    fn oracle_context(harness: &Harness, agent_turn: AgentTurn) -> DialogueContext<'_> {
        let mut ctx = harness.context();
        ctx.set_agent_turn(Some(agent_turn));
        ctx
    }

    #[test]
    fn test_oracle_refusal() {
        let harness = Harness::with_config(EngineConfig::default().with_agent_oracle(true));
        let mut ctx = oracle_context(
            &harness,
            agent(
                "I'm sorry, there is nothing available on friday.",
                &[("Booking-NoBook", &[("day", "friday")])],
            ),
        );

        let signal = expect_signal(run(&mut ctx, LENSFIELD_FULL));
        assert_eq!(signal.kind, SignalKind::InvalidInput);
        assert_eq!(
            signal.message,
            "Unfortunately the hotel can not confirm this booking. Maybe try another day or length of stay?"
        );
    }

    #[test]
    fn test_oracle_reference_code() {
        let harness = Harness::with_config(EngineConfig::default().with_agent_oracle(true));
        let mut ctx = oracle_context(
            &harness,
            agent(
                "Booked! Your reference number is 7GAWK763.",
                &[("Booking-Book", &[("ref", "7GAWK763")])],
            ),
        );

        let book = run(&mut ctx, LENSFIELD_FULL).expect("booking succeeds");
        let confirmation = ctx.graph.resolve(book);
        assert_eq!(ctx.graph.get_dat(confirmation, "conf_code"), Some("7GAWK763"));
    }

    #[test]
    fn test_oracle_only_booking() {
        let harness = Harness::with_config(
            EngineConfig::default()
                .with_agent_oracle(true)
                .with_oracle_only(true),
        );
        let mut ctx = oracle_context(&harness, agent("How many nights?", &[]));

        let signal = expect_signal(run(
            &mut ctx,
            "BookHotel(hotel=Hotel(name=\"lensfield hotel\"), book_info=HotelBookInfo())",
        ));
        assert_eq!(signal.kind, SignalKind::Oracle);
        assert_eq!(signal.message, "How many nights?");
    }

    #[test]
    fn test_custom_availability_check() {
        let registry = NodeRegistry::new();
        let datastore = create_datastore();
        let config = EngineConfig::default();
        let mut ctx = DialogueContext::new(&registry, &datastore, &FullyBooked, &config);

        let signal = expect_signal(run(&mut ctx, LENSFIELD_FULL));
        assert_eq!(signal.kind, SignalKind::InvalidInput);

        run(&mut ctx, "revise_hotel(bookstay=3, bookpeople=2, bookday=saturday)")
            .expect("booking succeeds");
        let book = ctx.goals.last().expect("live task");
        let confirmation = ctx.graph.resolve(book);
        assert_eq!(ctx.graph.get_dat(confirmation, "conf_code"), Some("OWN42"));
    }
}
