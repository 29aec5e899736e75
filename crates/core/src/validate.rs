use chrono::NaiveDate;

use crate::error::ValidationError;

pub const TRAVEL_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parses a user supplied `DD/MM/YYYY` travel date. Impossible calendar dates
/// such as `31/02/2025` are rejected.
pub fn parse_travel_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, TRAVEL_DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
}

pub fn validate_phone(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|ch| ch.is_ascii_digit()) {
        Ok(trimmed.to_string())
    } else {
        Err(ValidationError::InvalidPhone)
    }
}

pub fn parse_price(input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim().trim_start_matches('$');
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ValidationError::InvalidPrice(input.trim().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_day_month_year() {
        let date = parse_travel_date("15/06/2025").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
    }

    #[test]
    fn rejects_iso_dates_and_impossible_days() {
        assert!(matches!(
            parse_travel_date("2025-06-15"),
            Err(ValidationError::InvalidDate(_))
        ));
        assert!(parse_travel_date("31/02/2025").is_err());
        assert!(parse_travel_date("").is_err());
    }

    #[test]
    fn phone_must_be_digits() {
        assert_eq!(validate_phone(" 5551234 ").unwrap(), "5551234");
        assert_eq!(validate_phone("abc"), Err(ValidationError::InvalidPhone));
        assert_eq!(validate_phone("555-1234"), Err(ValidationError::InvalidPhone));
        assert_eq!(validate_phone(""), Err(ValidationError::InvalidPhone));
    }

    #[test]
    fn price_accepts_dollar_prefix() {
        assert_eq!(parse_price("$120.5").unwrap(), 120.5);
        assert!(parse_price("-3").is_err());
        assert!(parse_price("cheap").is_err());
    }
}
