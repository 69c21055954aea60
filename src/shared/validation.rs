//! Validation Utilities

use validator::ValidationErrors;

use crate::domain::Errors;

/// Convert validator output to the field -> messages report the API uses,
/// so local form checks and server responses render the same way.
pub fn report_from(errors: ValidationErrors) -> Errors {
    let mut report = Errors::default();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = error
                .message
                .clone()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string());
            report.push(field.to_string(), message);
        }
    }
    report
}
