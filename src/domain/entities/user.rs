//! User entity.
//!
//! Snapshot of a user document as returned by `GET /users/:id` and embedded
//! in posts and sessions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a user account.
///
/// Only `username` and `email` are always present; the remaining profile
/// fields are optional and filled in from the settings page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,

    /// Unique handle shown as `@username`
    pub username: String,

    /// Email address (unique)
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl User {
    /// "Firstname Lastname" when both profile fields are set.
    pub fn full_name(&self) -> Option<String> {
        match (&self.firstname, &self.lastname) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            _ => None,
        }
    }

    /// Whether a login identifier refers to this account.
    ///
    /// The login form accepts either the username or the email address.
    pub fn matches_logon(&self, logon: &str) -> bool {
        self.username == logon || self.email == logon
    }
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::nil(),
            username: String::new(),
            email: String::new(),
            firstname: None,
            lastname: None,
            birthdate: None,
            bio: None,
            location: None,
            website: None,
            created_at: now,
            updated_at: now,
        }
    }
}
