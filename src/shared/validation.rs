//! Validation Utilities

use validator::ValidationErrors;

use super::error::{AppError, FieldError};

/// Flatten validator output into field errors, sorted by field name.
///
/// `rename` maps struct field names to the names clients use on the wire.
pub fn field_errors(errors: &ValidationErrors, rename: impl Fn(&str) -> &str) -> Vec<FieldError> {
    let mut field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            let field = rename(&**field).to_string();
            errs.iter().map(move |e| FieldError {
                field: field.clone(),
                message: e
                    .message
                    .clone()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();
    field_errors.sort_by(|a, b| a.field.cmp(&b.field));
    field_errors
}

/// Convert field errors to AppError
pub fn validation_error(errors: Vec<FieldError>) -> AppError {
    let message = errors
        .first()
        .map(|e| format!("{}: {}", e.field, e.message))
        .unwrap_or_else(|| "Validation failed".into());

    AppError::Validation { message, errors }
}
