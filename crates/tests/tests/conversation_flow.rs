use std::path::PathBuf;
use std::sync::Arc;

use safar_agents::{FlightAssistant, ScriptedConsole, Session};
use safar_catalog::DataSources;
use safar_core::{Intent, TravelClass};
use safar_ml::SafarMlStack;
use safar_observability::SessionMetrics;
use safar_storage::REFERENCE_RANGE;

fn data_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

fn assistant() -> FlightAssistant {
    let (catalog, small_talk) = DataSources::in_dir(data_root())
        .load()
        .expect("shipped datasets should load");

    FlightAssistant::new(
        Arc::new(catalog),
        Arc::new(small_talk),
        SafarMlStack::builtin(0.5).expect("built-in examples should fit"),
        SessionMetrics::shared(),
    )
}

fn run(script: &[&str]) -> (Option<Session>, ScriptedConsole) {
    let mut console = ScriptedConsole::new(script.iter().copied());
    let session = assistant()
        .run(&mut console)
        .expect("conversation should not fail");
    (session, console)
}

#[test]
fn onboarding_rejects_non_digit_phone() {
    let (session, console) = run(&["Alice", "abc", "5551234", "exit"]);

    let session = session.expect("onboarding should complete");
    assert_eq!(session.user_name, "Alice");
    assert_eq!(session.user_phone, "5551234");
    assert_eq!(console.count("Please enter a valid phone number."), 1);
    assert!(console.contains("Nice to meet you, Alice! Can I have your phone number?"));
    assert_eq!(console.bot_lines().last(), Some(&"Goodbye! Have a great day!"));
}

#[test]
fn books_a_flight_and_lists_it() {
    let (session, console) = run(&[
        "Alice",
        "5551234",
        "book a flight",
        "london",
        "DUBAI",
        "15/06/2025",
        "economy",
        "sf103",
        "what is my booking",
        "what is my name",
        "quit",
    ]);

    let session = session.expect("session should finish normally");
    assert_eq!(session.bookings.len(), 1);

    let booking = &session.bookings.list()[0];
    assert_eq!(booking.flight_id, "SF103");
    assert_eq!(booking.class, TravelClass::Economy);
    assert!(REFERENCE_RANGE.contains(&booking.reference));

    assert!(console.contains("1. Flight SF101 from London to Dubai on 2025-06-15 (Economy) - $420"));
    assert!(console.contains("2. Flight SF103 from London to Dubai on 2025-06-15 (Economy) - $395"));
    assert!(!console.contains("SF102"));
    assert!(console.contains(&format!("Reference: {}", booking.reference)));
    assert!(console.contains("Your name is Alice."));
}

#[test]
fn updates_then_cancels_every_booking() {
    let (session, console) = run(&[
        "Bob",
        "4445555",
        "book a flight",
        "NYC",
        "LAX",
        "15/06/2025",
        "ECONOMY",
        "1",
        "change my booking",
        "date, class",
        "01/07/2025",
        "Business",
        "cancel my booking",
        "no",
        "cancel my booking",
        "yes",
        "booking info",
        "goodbye",
    ]);

    let session = session.expect("session should finish normally");
    assert!(session.bookings.is_empty());
    assert!(console.contains("has been updated to 01/07/2025."));
    assert!(console.contains("has been updated to Business."));
    assert!(console.contains("Cancellation aborted."));
    assert!(console.contains("All your bookings have been cancelled."));
    assert!(console.contains("You have no active bookings."));
}

#[test]
fn help_and_catalog_listing() {
    let (_, console) = run(&["Alice", "5551234", "help", "list flights", "exit"]);

    assert!(console.contains("- Book flight: book a flight, reserve a flight..."));
    assert!(console.contains("- Bot name: what is your name, who are you..."));
    assert!(console.contains("Flight SF111 from Paris to Tokyo on 2025-08-03 (Economy) - $760.50"));
    assert!(console.contains("Flight SF112 from Paris to Tokyo on 2025-08-03 (Business) - $2480"));
}

#[test]
fn small_talk_and_unknown_input_keep_the_loop_alive() {
    let (session, console) = run(&[
        "Alice",
        "5551234",
        "what's up",
        "quantum chromodynamics",
        "",
        "who are you",
        "bye now",
        "exit",
    ]);

    assert!(session.is_some());
    assert!(console.contains("Just watching the departure boards."));
    assert_eq!(
        console.count("I'm sorry, I didn't understand that. Can you please try again?"),
        3
    );
    assert!(console.contains("My name is Flight Assistant!"));
}

#[test]
fn closed_input_during_onboarding_ends_quietly() {
    let (session, console) = run(&["Alice", "abc"]);

    assert!(session.is_none());
    assert_eq!(console.remaining_inputs(), 0);
}

#[test]
fn intent_dataset_extends_the_builtin_phrases() {
    let stack = SafarMlStack::load(Some(data_root().join("intents.jsonl").as_path()), 0.5)
        .expect("dataset should fit");

    assert_eq!(stack.examples.len(), 30);
    assert_eq!(stack.classifier.predict("I want to fly").intent, Intent::BookFlight);
    assert_eq!(stack.classifier.predict("bye").intent, Intent::Farewell);
    assert_eq!(stack.classifier.predict("order a pizza").intent, Intent::Unknown);
}
