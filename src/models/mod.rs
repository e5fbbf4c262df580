pub mod department;
pub mod employee;

use serde_json::Value;
use validator::{ValidationError, ValidationErrors};

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Pulls a required string field out of a candidate JSON value, recording a
/// field-keyed error when it is missing, null, mistyped, or empty. Validation
/// never touches the store.
pub(crate) fn required_string(
    candidate: &Value,
    field: &'static str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match candidate.get(field) {
        None | Some(Value::Null) => {
            errors.add(field, field_error("required", "field is required"));
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            errors.add(field, field_error("length", "must not be empty"));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.add(field, field_error("expected_string", "expected a string"));
            None
        }
    }
}

/// Patch variant: absent and null fields are simply not part of the patch,
/// but a field that is present must be a non-empty string.
pub(crate) fn optional_string(
    candidate: &Value,
    field: &'static str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match candidate.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => {
            errors.add(field, field_error("length", "must not be empty"));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.add(field, field_error("expected_string", "expected a string"));
            None
        }
    }
}
