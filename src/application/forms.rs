//! Form Validation
//!
//! Client-side pre-validation for the auth and composer forms, producing
//! the same field -> messages report the API returns so pages render local
//! and remote errors identically. The server remains authoritative; these
//! checks only catch the obvious cases before a round-trip.

use validator::Validate;

use crate::domain::Errors;
use crate::shared::validation::report_from;

/// Run a form's declared rules, returning a report on failure.
pub fn validate<T: Validate>(form: &T) -> Option<Errors> {
    form.validate().err().map(report_from)
}

/// Login form: both fields are required; credentials themselves are only
/// checked server-side.
#[derive(Debug, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Username or email is required"))]
    pub logon: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration form.
#[derive(Debug, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, max = 32, message = "Username must be between 1 and 32 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Post composer, for both new posts and replies.
#[derive(Debug, Validate)]
pub struct PostForm {
    #[validate(length(min = 1, max = 500, message = "Text must be between 1 and 500 characters"))]
    pub text: String,
}

/// Password change form with local confirmation check.
#[derive(Debug, Validate)]
pub struct ChangePasswordForm {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub confirm_password: String,
}

impl ChangePasswordForm {
    /// Declared rules plus the confirm-password equality check, which
    /// validator cannot express per-field.
    pub fn validate_with_confirmation(&self) -> Option<Errors> {
        let mut report = validate(self).unwrap_or_default();
        if self.password != self.confirm_password {
            report.push("confirm_password", "Passwords do not match");
        }
        (!report.is_empty()).then_some(report)
    }
}
