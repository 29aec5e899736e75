use thiserror::Error;

/// User input that failed validation. The display text is shown to the user
/// as-is, so it reads as a bot reply rather than a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid date format. Please use DD/MM/YYYY.")]
    InvalidDate(String),
    #[error("Please enter a valid phone number.")]
    InvalidPhone,
    #[error("Invalid class '{0}'. Please choose Economy or Business.")]
    InvalidClass(String),
    #[error("Invalid price '{0}'. Please enter a non-negative amount.")]
    InvalidPrice(String),
    #[error("Invalid field '{0}'. Skipping.")]
    UnknownField(String),
    #[error("The booking reference cannot be changed. Skipping.")]
    ReadOnlyField,
}
