pub mod error;
pub mod intent;
pub mod models;
pub mod validate;

pub use error::ValidationError;
pub use intent::{normalize_text, IntentExampleSet, IntentExamples};
pub use models::*;
pub use validate::{parse_price, parse_travel_date, validate_phone, TRAVEL_DATE_FORMAT};
