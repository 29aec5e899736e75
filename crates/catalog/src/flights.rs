use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use safar_core::{parse_travel_date, FlightRecord, ValidationError};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),
    #[error("Sorry, no flights are available for the selected criteria. Try another.")]
    NotFound,
}

/// Read-only flight table, in the order the source listed it.
#[derive(Debug, Clone, Default)]
pub struct FlightCatalog {
    flights: Vec<FlightRecord>,
}

impl FlightCatalog {
    pub fn new(flights: Vec<FlightRecord>) -> Self {
        Self { flights }
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed opening flight catalog: {}", path.display()))?;
        let catalog = Self::from_reader(file)
            .with_context(|| format!("failed loading flight catalog: {}", path.display()))?;

        info!(path = %path.display(), flights = catalog.len(), "flight catalog loaded");
        Ok(catalog)
    }

    /// Expects the header `flight_id,origin,destination,departure_date,flight_class,price`
    /// with ISO `YYYY-MM-DD` dates. Any malformed row fails the whole load.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut flights = Vec::new();
        for (idx, row) in csv_reader.deserialize::<FlightRecord>().enumerate() {
            // header is line 1
            let line = idx + 2;
            let flight = row.with_context(|| format!("malformed flight row at line {line}"))?;
            if !flight.price.is_finite() || flight.price < 0.0 {
                anyhow::bail!("flight {} at line {line} has a negative price", flight.id);
            }
            flights.push(flight);
        }

        Ok(Self { flights })
    }

    pub fn all(&self) -> &[FlightRecord] {
        &self.flights
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Flights matching every criterion. `date` is `DD/MM/YYYY`; text fields
    /// compare case-insensitively. An empty match is `SearchError::NotFound`.
    pub fn search(
        &self,
        origin: &str,
        destination: &str,
        date: &str,
        class: &str,
    ) -> Result<Vec<FlightRecord>, SearchError> {
        let date = parse_travel_date(date)?;
        let origin = origin.trim().to_lowercase();
        let destination = destination.trim().to_lowercase();
        let class = class.trim().to_lowercase();

        let matches = self
            .flights
            .iter()
            .filter(|flight| flight.origin.to_lowercase() == origin)
            .filter(|flight| flight.destination.to_lowercase() == destination)
            .filter(|flight| flight.departure_date == date)
            .filter(|flight| flight.class.as_str().to_lowercase() == class)
            .cloned()
            .collect::<Vec<_>>();

        debug!(
            origin = %origin,
            destination = %destination,
            date = %date,
            class = %class,
            hits = matches.len(),
            "flight search"
        );

        if matches.is_empty() {
            Err(SearchError::NotFound)
        } else {
            Ok(matches)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use safar_core::TravelClass;

    use super::*;

    const CSV: &str = "\
flight_id,origin,destination,departure_date,flight_class,price
FL100,nyc,lax,2025-06-15,ECONOMY,250
FL101,NYC,LAX,2025-06-15,Business,900
FL102,NYC,LAX,2025-06-16,Economy,240
FL103,LAX,NYC,2025-06-15,Economy,260
";

    fn catalog() -> FlightCatalog {
        FlightCatalog::from_reader(CSV.as_bytes()).unwrap()
    }

    #[test]
    fn loads_rows_in_order() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.all()[0].id, "FL100");
        assert_eq!(catalog.all()[0].class, TravelClass::Economy);
        assert_eq!(
            catalog.all()[0].departure_date,
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
        );
    }

    #[test]
    fn search_ignores_case_on_text_fields() {
        let hits = catalog().search("NYC", "LAX", "15/06/2025", "Economy").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "FL100");

        let hits = catalog().search("nyc", "lax", "15/06/2025", "economy").unwrap();
        assert_eq!(hits[0].id, "FL100");
    }

    #[test]
    fn search_rejects_iso_dates() {
        let err = catalog()
            .search("NYC", "LAX", "2025-06-15", "Economy")
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidInput(ValidationError::InvalidDate(_))));
        assert_eq!(err.to_string(), "Invalid date format. Please use DD/MM/YYYY.");
    }

    #[test]
    fn empty_match_is_not_found() {
        let err = catalog()
            .search("NYC", "SFO", "15/06/2025", "Economy")
            .unwrap_err();
        assert_eq!(err, SearchError::NotFound);
    }

    #[test]
    fn malformed_rows_fail_the_load() {
        let bad = "flight_id,origin,destination,departure_date,flight_class,price\nFL1,A,B,15/06/2025,Economy,10\n";
        assert!(FlightCatalog::from_reader(bad.as_bytes()).is_err());

        let bad_class = "flight_id,origin,destination,departure_date,flight_class,price\nFL1,A,B,2025-06-15,First,10\n";
        assert!(FlightCatalog::from_reader(bad_class.as_bytes()).is_err());

        let negative = "flight_id,origin,destination,departure_date,flight_class,price\nFL1,A,B,2025-06-15,Economy,-1\n";
        assert!(FlightCatalog::from_reader(negative.as_bytes()).is_err());
    }
}
