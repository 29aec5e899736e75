use safar_core::{format_price, BookingRecord, FlightRecord, IntentExampleSet};

pub fn numbered_flights(flights: &[FlightRecord]) -> Vec<String> {
    flights
        .iter()
        .enumerate()
        .map(|(idx, flight)| format!("{}. {}", idx + 1, flight.summary()))
        .collect()
}

pub fn booking_confirmation(booking: &BookingRecord) -> Vec<String> {
    vec![
        "Booking Details:".to_string(),
        format!("Name: {}", booking.name),
        format!("Phone: {}", booking.phone),
        format!("Flight: {}", booking.flight_id),
        format!("From: {} To: {}", booking.origin, booking.destination),
        format!("Date: {} Class: {}", booking.date, booking.class),
        format!("Price: ${}", format_price(booking.price)),
    ]
}

pub fn booking_overview(booking: &BookingRecord) -> Vec<String> {
    vec![
        format!("Reference: {}", booking.reference),
        format!("Flight: {}", booking.flight_id),
        format!("From: {} To: {}", booking.origin, booking.destination),
        format!("Date: {} Class: {}", booking.date, booking.class),
        format!("Price: ${}", format_price(booking.price)),
        String::new(),
    ]
}

/// One line per intent quoting its first two example phrases.
pub fn help_lines(examples: &IntentExampleSet) -> Vec<String> {
    examples
        .groups()
        .iter()
        .map(|group| {
            let shown = group
                .phrases
                .iter()
                .take(2)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            format!("- {}: {}...", group.intent.display_name(), shown)
        })
        .collect()
}
