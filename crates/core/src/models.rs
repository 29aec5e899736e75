use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    BookFlight,
    ViewFlights,
    SmallTalk,
    Farewell,
    MyBooking,
    UpdateBooking,
    CancelBooking,
    MyName,
    BotName,
    Help,
    Unknown,
}

impl Intent {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "book_flight" => Some(Self::BookFlight),
            "view_flights" => Some(Self::ViewFlights),
            "small_talk" => Some(Self::SmallTalk),
            "farewell" => Some(Self::Farewell),
            "my_booking" => Some(Self::MyBooking),
            "update_booking" => Some(Self::UpdateBooking),
            "cancel_booking" => Some(Self::CancelBooking),
            "my_name" => Some(Self::MyName),
            "bot_name" => Some(Self::BotName),
            "help" => Some(Self::Help),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            Self::BookFlight => "book_flight",
            Self::ViewFlights => "view_flights",
            Self::SmallTalk => "small_talk",
            Self::Farewell => "farewell",
            Self::MyBooking => "my_booking",
            Self::UpdateBooking => "update_booking",
            Self::CancelBooking => "cancel_booking",
            Self::MyName => "my_name",
            Self::BotName => "bot_name",
            Self::Help => "help",
            Self::Unknown => "unknown",
        }
    }

    /// Human readable name used in the help listing, e.g. "Book flight".
    pub fn display_name(self) -> String {
        let spaced = self.as_label().replace('_', " ");
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum TravelClass {
    Economy,
    Business,
}

impl TravelClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Economy => "Economy",
            Self::Business => "Business",
        }
    }
}

impl FromStr for TravelClass {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "economy" => Ok(Self::Economy),
            "business" => Ok(Self::Business),
            _ => Err(ValidationError::InvalidClass(value.trim().to_string())),
        }
    }
}

impl TryFrom<String> for TravelClass {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for TravelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the flight catalog. Column names follow the catalog CSV header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    #[serde(rename = "flight_id")]
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    #[serde(rename = "flight_class")]
    pub class: TravelClass,
    pub price: f64,
}

impl FlightRecord {
    pub fn summary(&self) -> String {
        format!(
            "Flight {} from {} to {} on {} ({}) - ${}",
            self.id,
            self.origin,
            self.destination,
            self.departure_date,
            self.class,
            format_price(self.price)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmallTalkEntry {
    pub question: String,
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub reference: u16,
    pub name: String,
    pub phone: String,
    pub flight_id: String,
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub class: TravelClass,
    pub price: f64,
}

impl BookingRecord {
    pub fn from_flight(reference: u16, flight: &FlightRecord, name: &str, phone: &str) -> Self {
        Self {
            reference,
            name: name.to_string(),
            phone: phone.to_string(),
            flight_id: flight.id.clone(),
            origin: flight.origin.clone(),
            destination: flight.destination.clone(),
            date: flight.departure_date,
            class: flight.class,
            price: flight.price,
        }
    }
}

/// Booking fields addressable by an update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingField {
    Name,
    Phone,
    FlightId,
    Origin,
    Destination,
    Date,
    Class,
    Price,
    Reference,
}

impl BookingField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::FlightId => "flight_id",
            Self::Origin => "origin",
            Self::Destination => "destination",
            Self::Date => "date",
            Self::Class => "class",
            Self::Price => "price",
            Self::Reference => "reference",
        }
    }
}

impl FromStr for BookingField {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "phone" => Ok(Self::Phone),
            "flight_id" | "flight" => Ok(Self::FlightId),
            "origin" => Ok(Self::Origin),
            "destination" => Ok(Self::Destination),
            "date" => Ok(Self::Date),
            "class" => Ok(Self::Class),
            "price" => Ok(Self::Price),
            "reference" => Ok(Self::Reference),
            other => Err(ValidationError::UnknownField(other.to_string())),
        }
    }
}

impl fmt::Display for BookingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prices print without a fractional part when they are whole amounts.
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{price:.0}")
    } else {
        format!("{price:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_labels_round_trip_through_parse() {
        for intent in [Intent::BookFlight, Intent::CancelBooking, Intent::Help] {
            assert_eq!(Intent::parse(intent.as_label()), Some(intent));
        }
        assert_eq!(Intent::parse("order_pizza"), None);
    }

    #[test]
    fn display_name_is_capitalised() {
        assert_eq!(Intent::BookFlight.display_name(), "Book flight");
        assert_eq!(Intent::Help.display_name(), "Help");
    }

    #[test]
    fn travel_class_parses_case_insensitively() {
        assert_eq!("ECONOMY".parse::<TravelClass>(), Ok(TravelClass::Economy));
        assert_eq!(" business ".parse::<TravelClass>(), Ok(TravelClass::Business));
        assert!("first".parse::<TravelClass>().is_err());
    }

    #[test]
    fn booking_field_rejects_unknown_names() {
        assert_eq!("Date".parse::<BookingField>(), Ok(BookingField::Date));
        assert_eq!(
            "seat".parse::<BookingField>(),
            Err(ValidationError::UnknownField("seat".to_string()))
        );
    }

    #[test]
    fn prices_drop_zero_cents() {
        assert_eq!(format_price(250.0), "250");
        assert_eq!(format_price(199.5), "199.50");
    }
}
