//! Client Error Types
//!
//! Centralized error handling for API calls and local storage.
//!
//! Errors are handled at the component that initiated the request: forms
//! show `Validation` reports inline, an `Unauthorized` on a validate call
//! triggers a silent logout, `NotFound` renders a dedicated view, and the
//! remaining variants surface as a generic retry affordance.

use crate::domain::Errors;

/// Client error type
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Non-200 response carrying a field -> messages validation report
    #[error("validation failed: {0}")]
    Validation(Errors),

    /// 401: missing, invalid, or expired bearer token
    #[error("unauthorized")]
    Unauthorized,

    /// 404: the requested resource does not exist
    #[error("not found")]
    NotFound,

    /// Any other unexpected response status
    #[error("unexpected status code {0}")]
    UnexpectedStatus(u16),

    /// Transport-level failure (connection refused, timeout, TLS, ...)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Durable token storage could not be read or written
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Response body was not the JSON document we expected
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether this error represents the server rejecting the request,
    /// as opposed to the request never completing.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ClientError::Validation(_)
                | ClientError::Unauthorized
                | ClientError::NotFound
                | ClientError::UnexpectedStatus(_)
        )
    }

    /// The validation report, if this error carries one.
    pub fn into_report(self) -> Option<Errors> {
        match self {
            ClientError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
