//! Session entity.
//!
//! A server-side session as shown on the sessions settings page. Created on
//! login, represented client-side as a read-mostly snapshot, destroyed by
//! explicit revocation or expiry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,

    pub user_id: Uuid,

    /// The bearer token backing this session. Some API endpoints omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Address the session was created from
    pub ip_address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_latitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_longitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_country: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_os: Option<String>,

    pub expires_at: DateTime<Utc>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Owning user, embedded by some endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Human-readable client description, e.g. "Firefox 126 on Linux".
    pub fn client_label(&self) -> String {
        let name = self.client_name.as_deref().unwrap_or("Unknown client");
        let mut label = name.to_string();
        if let Some(version) = &self.client_version {
            label.push(' ');
            label.push_str(version);
        }
        if let Some(os) = &self.client_os {
            label.push_str(" on ");
            label.push_str(os);
        }
        label
    }

    /// Human-readable location, falling back to the bare IP address.
    pub fn location_label(&self) -> String {
        match (&self.ip_city, &self.ip_country) {
            (Some(city), Some(country)) => format!("{}, {} ({})", city, country, self.ip_address),
            (None, Some(country)) => format!("{} ({})", country, self.ip_address),
            _ => self.ip_address.clone(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            token: None,
            ip_address: String::new(),
            ip_latitude: None,
            ip_longitude: None,
            ip_country: None,
            ip_city: None,
            client_name: None,
            client_version: None,
            client_os: None,
            expires_at: now,
            created_at: now,
            updated_at: now,
            user: None,
        }
    }
}
