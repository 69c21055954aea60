//! Users Service
//!
//! Profile fetching and editing. User routes accept either a user id or a
//! username, matching the links rendered as `/users/:user_id`.

use std::sync::Arc;

use reqwest::Method;
use uuid::Uuid;

use crate::domain::{AuthToken, Post, User};
use crate::infrastructure::api::ApiClient;
use crate::shared::error::ClientError;
use crate::shared::signal::Signal;

/// Editable profile fields, submitted from the profile edit form.
/// Empty strings clear the matching optional field.
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    pub birthdate: String,
    pub bio: String,
    pub location: String,
    pub website: String,
}

pub struct UsersService {
    api: Arc<ApiClient>,
    token: Signal<Option<AuthToken>>,
}

impl UsersService {
    pub fn new(api: Arc<ApiClient>, token: Signal<Option<AuthToken>>) -> Self {
        Self { api, token }
    }

    /// Fetch a user by id or username; `Ok(None)` when absent.
    pub async fn get(&self, user_id: &str) -> Result<Option<User>, ClientError> {
        let response = self
            .api
            .get::<User>(&format!("/users/{}", user_id), self.bearer().as_ref())
            .await;
        match response {
            Ok(user) => Ok(Some(user)),
            Err(ClientError::NotFound) => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Update a profile; returns the fresh user document.
    pub async fn update(&self, user_id: Uuid, profile: &UserProfile) -> Result<User, ClientError> {
        self.api
            .form(
                Method::PUT,
                &format!("/users/{}", user_id),
                &[
                    ("firstname", profile.firstname.as_str()),
                    ("lastname", profile.lastname.as_str()),
                    ("username", profile.username.as_str()),
                    ("email", profile.email.as_str()),
                    ("birthdate", profile.birthdate.as_str()),
                    ("bio", profile.bio.as_str()),
                    ("location", profile.location.as_str()),
                    ("website", profile.website.as_str()),
                ],
                self.bearer().as_ref(),
            )
            .await
    }

    /// One page of a user's posts.
    pub async fn posts(&self, user_id: &str, page: u32) -> Result<Vec<Post>, ClientError> {
        self.api
            .get_query(
                &format!("/users/{}/posts", user_id),
                &[("page", &page.to_string())],
                self.bearer().as_ref(),
            )
            .await
    }

    fn bearer(&self) -> Option<AuthToken> {
        self.token.get()
    }
}
