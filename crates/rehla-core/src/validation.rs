//! Validation utilities.

use crate::{FieldError, RehlaError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `RehlaError` on failure.
    fn validate_request(&self) -> Result<(), RehlaError> {
        self.validate().map_err(validation_errors_to_rehla_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors, sorted by field.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string),
                code: error.code.to_string(),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

/// Converts `validator::ValidationErrors` to `RehlaError`.
#[must_use]
pub fn validation_errors_to_rehla_error(errors: ValidationErrors) -> RehlaError {
    let message = field_errors(&errors)
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    RehlaError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Minimum password length accepted at signup and reset.
    pub const MIN_PASSWORD_LEN: usize = 8;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates an Iraqi mobile number: `07` followed by nine digits.
    pub fn phone_number(value: &str) -> Result<(), ValidationError> {
        let valid = value.len() == 11
            && value.starts_with("07")
            && value.chars().all(|c| c.is_ascii_digit());
        if !valid {
            return Err(ValidationError::new("phone_number"));
        }
        Ok(())
    }

    /// Validates password length.
    pub fn password_length(password: &str) -> Result<(), ValidationError> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::new("password_too_short"));
        }
        Ok(())
    }

    /// Validates a lecture/exam/material position (1-based).
    pub fn positive_order(order: i64) -> Result<(), ValidationError> {
        if order < 1 {
            return Err(ValidationError::new("order_not_positive"));
        }
        Ok(())
    }
}
