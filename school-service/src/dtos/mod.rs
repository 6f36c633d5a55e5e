pub mod admissions;
pub mod auth;
pub mod dashboard;
pub mod fees;
pub mod records;

pub use admissions::*;
pub use auth::*;
pub use dashboard::*;
pub use fees::*;
pub use records::*;

use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Money fields are decimals, which `validator` has no range rule for.
pub fn check_non_negative(
    field: &'static str,
    amount: Option<rust_decimal::Decimal>,
) -> Result<(), ValidationErrors> {
    match amount {
        Some(value) if value.is_sign_negative() => {
            let mut errors = ValidationErrors::new();
            let mut error = ValidationError::new("range");
            error.message = Some("must not be negative".into());
            errors.add(field, error);
            Err(errors)
        }
        _ => Ok(()),
    }
}
