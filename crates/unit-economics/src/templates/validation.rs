use std::fmt;

use serde::{Deserialize, Serialize};

use super::field::FieldDescriptor;
use super::raw::RawInputs;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Outcome of a template's `validate`; never an error in itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.valid {
            Ok(())
        } else {
            Err(ValidationErrors {
                errors: self.errors,
            })
        }
    }
}

/// Non-empty list of field-level failures. The caller picks which message to show first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn first_message(&self) -> &str {
        self.errors
            .first()
            .map(|error| error.message.as_str())
            .unwrap_or("invalid inputs")
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.len() {
            0 | 1 => write!(f, "{}", self.first_message()),
            count => write!(f, "{} (and {} more)", self.first_message(), count - 1),
        }
    }
}

impl std::error::Error for ValidationErrors {}

/// Required-ness and bounds, field by field in form order.
pub(crate) fn check_fields(fields: &[FieldDescriptor], raw: &RawInputs) -> Vec<FieldError> {
    fields
        .iter()
        .filter_map(|field| match raw.get(field.id) {
            None if field.required => {
                Some(FieldError::new(field.id, format!("{} is required", field.label)))
            }
            None => None,
            Some(value) => field
                .constraint
                .check(field.label, value)
                .map(|message| FieldError::new(field.id, message)),
        })
        .collect()
}
