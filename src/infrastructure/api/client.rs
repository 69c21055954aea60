//! HTTP client for the PlaatBook REST API.
//!
//! Thin request/response mapping shared by every service wrapper: base URL
//! joining, bearer authentication, form-encoded request bodies, JSON
//! response decoding, and status-to-error translation.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ApiSettings;
use crate::domain::{AuthToken, Errors};
use crate::shared::error::ClientError;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client against the configured API base URL.
    pub fn new(settings: &ApiSettings) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a JSON document.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&AuthToken>,
    ) -> Result<T, ClientError> {
        self.get_query(path, &[], token).await
    }

    /// GET a JSON document with URL query parameters.
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        token: Option<&AuthToken>,
    ) -> Result<T, ClientError> {
        let request = self
            .http
            .get(self.url(path))
            .query(query);
        let response = Self::authorize(request, token).send().await?;
        Self::decode(path, response).await
    }

    /// Send a form-encoded body and decode the JSON response.
    pub async fn form<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        fields: &[(&str, &str)],
        token: Option<&AuthToken>,
    ) -> Result<T, ClientError> {
        let request = self
            .http
            .request(method, self.url(path))
            .form(fields);
        let response = Self::authorize(request, token).send().await?;
        Self::decode(path, response).await
    }

    /// Send a bodyless request where only the status matters.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&AuthToken>,
    ) -> Result<(), ClientError> {
        let request = self.http.request(method, self.url(path));
        let response = Self::authorize(request, token).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::error_for(status, &response.bytes().await.unwrap_or_default()))
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(request: RequestBuilder, token: Option<&AuthToken>) -> RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token.as_str()),
            None => request,
        }
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.bytes().await?;
        if status.is_success() {
            Ok(serde_json::from_slice(&body)?)
        } else {
            debug!(%path, status = status.as_u16(), "API request rejected");
            Err(Self::error_for(status, &body))
        }
    }

    fn error_for(status: StatusCode, body: &[u8]) -> ClientError {
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::NOT_FOUND => ClientError::NotFound,
            StatusCode::BAD_REQUEST => {
                // Invalid form submissions carry a field -> messages report
                match serde_json::from_slice::<Errors>(body) {
                    Ok(errors) if !errors.is_empty() => ClientError::Validation(errors),
                    _ => ClientError::UnexpectedStatus(status.as_u16()),
                }
            }
            other => ClientError::UnexpectedStatus(other.as_u16()),
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("base_url", &self.base_url).finish()
    }
}
