//! The single error kind raised by calculator kernels.
//!
//! Every compute function either returns its result record or a
//! [`ValidationError`] naming the input field that caused the rejection.
//! Errors are meant to be displayed next to the offending form field and
//! are always recoverable by correcting the input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An input was missing, unparseable, or outside the calculator's domain.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Name of the offending input field (e.g. `"principal"`).
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl ValidationError {
    /// A required field was left empty.
    pub fn required(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: "a value is required".to_string(),
        }
    }

    /// A field could not be parsed as a number.
    pub fn not_a_number(
        field: impl Into<String>,
        raw: &str,
    ) -> Self {
        Self {
            field: field.into(),
            message: format!("'{}' is not a valid number", raw.trim()),
        }
    }

    /// A field parsed fine but violates a domain constraint.
    pub fn invalid(
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Shorthand used by every calculator module.
pub type CalcResult<T> = Result<T, ValidationError>;
