use std::collections::HashSet;
use std::ops::RangeInclusive;

use rand::Rng;
use safar_core::{
    parse_price, parse_travel_date, validate_phone, BookingField, BookingRecord, FlightRecord,
    TravelClass, ValidationError,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

pub const REFERENCE_RANGE: RangeInclusive<u16> = 1000..=9999;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("Sorry, no booking references are left for this session.")]
    ReferencesExhausted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldUpdate {
    pub reference: u16,
    pub field: BookingField,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldRejection {
    pub reference: u16,
    pub field_name: String,
    pub error: ValidationError,
}

/// Outcome of a bulk update, in booking-then-field order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateReport {
    pub applied: Vec<FieldUpdate>,
    pub rejected: Vec<FieldRejection>,
}

/// Bookings made during one conversation, in the order they were made.
#[derive(Debug, Clone, Default)]
pub struct BookingStore {
    bookings: Vec<BookingRecord>,
}

impl BookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn book(
        &mut self,
        flight: &FlightRecord,
        name: &str,
        phone: &str,
    ) -> Result<BookingRecord, BookingError> {
        self.book_with_rng(&mut rand::rng(), flight, name, phone)
    }

    /// Books `flight` under a random reference that no other booking in this
    /// store is using.
    pub fn book_with_rng<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        flight: &FlightRecord,
        name: &str,
        phone: &str,
    ) -> Result<BookingRecord, BookingError> {
        let taken = self
            .bookings
            .iter()
            .map(|booking| booking.reference)
            .collect::<HashSet<_>>();
        let capacity = usize::from(REFERENCE_RANGE.end() - REFERENCE_RANGE.start()) + 1;
        if taken.len() >= capacity {
            return Err(BookingError::ReferencesExhausted);
        }

        let reference = loop {
            let candidate = rng.random_range(REFERENCE_RANGE);
            if !taken.contains(&candidate) {
                break candidate;
            }
            debug!(reference = candidate, "booking reference collision, drawing again");
        };

        let booking = BookingRecord::from_flight(reference, flight, name, phone);
        self.bookings.push(booking.clone());
        info!(reference, flight_id = %flight.id, "booking created");
        Ok(booking)
    }

    /// Applies every `(field, value)` pair to every booking. A pair that fails
    /// validation is skipped for that booking and reported; the rest still
    /// apply.
    pub fn update<F, V>(&mut self, changes: &[(F, V)]) -> UpdateReport
    where
        F: AsRef<str>,
        V: AsRef<str>,
    {
        let mut report = UpdateReport::default();

        for booking in &mut self.bookings {
            for (field_name, value) in changes {
                let field_name = field_name.as_ref().trim().to_lowercase();
                let outcome = field_name
                    .parse::<BookingField>()
                    .and_then(|field| apply_field(booking, field, value.as_ref()).map(|v| (field, v)));

                match outcome {
                    Ok((field, value)) => report.applied.push(FieldUpdate {
                        reference: booking.reference,
                        field,
                        value,
                    }),
                    Err(error) => report.rejected.push(FieldRejection {
                        reference: booking.reference,
                        field_name,
                        error,
                    }),
                }
            }
        }

        info!(
            applied = report.applied.len(),
            rejected = report.rejected.len(),
            "bookings updated"
        );
        report
    }

    /// Clears every booking when `confirmation` is "yes". Returns whether the
    /// store was cleared.
    pub fn cancel_all(&mut self, confirmation: &str) -> bool {
        if !confirmation.trim().eq_ignore_ascii_case("yes") {
            return false;
        }

        let cancelled = self.bookings.len();
        self.bookings.clear();
        info!(cancelled, "all bookings cancelled");
        true
    }

    pub fn list(&self) -> &[BookingRecord] {
        &self.bookings
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

/// Writes one validated field and returns the value as the user typed it.
fn apply_field(
    booking: &mut BookingRecord,
    field: BookingField,
    value: &str,
) -> Result<String, ValidationError> {
    let value = value.trim();
    match field {
        BookingField::Name => booking.name = value.to_string(),
        BookingField::Phone => booking.phone = validate_phone(value)?,
        BookingField::FlightId => booking.flight_id = value.to_string(),
        BookingField::Origin => booking.origin = value.to_string(),
        BookingField::Destination => booking.destination = value.to_string(),
        BookingField::Date => booking.date = parse_travel_date(value)?,
        BookingField::Class => booking.class = value.parse::<TravelClass>()?,
        BookingField::Price => booking.price = parse_price(value)?,
        BookingField::Reference => return Err(ValidationError::ReadOnlyField),
    }
    Ok(value.to_string())
}
