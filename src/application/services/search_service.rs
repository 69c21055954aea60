//! Search Service
//!
//! Combined user and post search. Results land in a reactive cell so the
//! search page re-renders as they arrive; each query takes a fresh request
//! generation, and a response that lost the race to a newer query is
//! dropped instead of overwriting its results.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{AuthToken, Post, User};
use crate::infrastructure::api::ApiClient;
use crate::shared::error::ClientError;
use crate::shared::generation::GenerationCounter;
use crate::shared::signal::Signal;

/// `GET /search` response document.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub posts: Vec<Post>,
}

pub struct SearchService {
    api: Arc<ApiClient>,
    token: Signal<Option<AuthToken>>,
    results: Signal<Option<SearchResults>>,
    generations: GenerationCounter,
}

impl SearchService {
    pub fn new(api: Arc<ApiClient>, token: Signal<Option<AuthToken>>) -> Self {
        Self {
            api,
            token,
            results: Signal::new(None),
            generations: GenerationCounter::new(),
        }
    }

    /// The latest results cell; `None` while a query is in flight.
    pub fn results(&self) -> Signal<Option<SearchResults>> {
        self.results.clone()
    }

    /// Run a search and publish its results, unless superseded.
    pub async fn search(&self, query: &str, page: u32) -> Result<(), ClientError> {
        let pass = self.generations.begin();
        // Clear stale results before the request goes out
        self.results.set(None);

        let response = self
            .api
            .get_query::<SearchResults>(
                "/search",
                &[("q", query), ("page", &page.to_string())],
                self.token.get().as_ref(),
            )
            .await;

        if !pass.is_current() {
            debug!(%query, "Discarding superseded search response");
            return Ok(());
        }
        match response {
            Ok(results) => {
                self.results.set(Some(results));
                Ok(())
            }
            Err(error) => Err(error),
        }
    }
}
