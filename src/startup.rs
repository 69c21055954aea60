//! Application startup and wiring.
//!
//! `App` owns every store and service and hands shared cells between them
//! explicitly; nothing in the crate reaches for a global. Pages receive
//! the `App` (or the pieces they need) from their mount context.

use std::sync::Arc;

use tracing::info;

use crate::application::services::{AuthService, PostsService, SearchService, UsersService};
use crate::config::Settings;
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::storage::{FileTokenStorage, TokenStorage};
use crate::presentation::router::{Navigator, RouteTable};
use crate::presentation::routes::{self, Page, Resolution};
use crate::shared::error::ClientError;

pub struct App {
    settings: Settings,
    navigator: Navigator,
    routes: RouteTable<Page>,
    auth: Arc<AuthService>,
    posts: Arc<PostsService>,
    users: Arc<UsersService>,
    search: Arc<SearchService>,
}

impl App {
    /// Build the client with file-backed token storage.
    pub fn build(settings: Settings) -> Result<Self, ClientError> {
        let tokens_path = settings
            .storage
            .tokens_file
            .clone()
            .unwrap_or_else(FileTokenStorage::default_path);
        let storage = Arc::new(FileTokenStorage::new(tokens_path));
        Self::with_storage(settings, storage)
    }

    /// Build the client against any token storage (tests use the
    /// in-memory implementation).
    pub fn with_storage(
        settings: Settings,
        storage: Arc<dyn TokenStorage>,
    ) -> Result<Self, ClientError> {
        let api = Arc::new(ApiClient::new(&settings.api)?);
        let navigator = Navigator::new("/");
        let auth = Arc::new(AuthService::new(
            Arc::clone(&api),
            storage,
            navigator.clone(),
        ));
        let posts = Arc::new(PostsService::new(Arc::clone(&api), auth.token()));
        let users = Arc::new(UsersService::new(Arc::clone(&api), auth.token()));
        let search = Arc::new(SearchService::new(Arc::clone(&api), auth.token()));
        info!(api_url = %api.base_url(), "Client assembled");

        Ok(Self {
            settings,
            navigator,
            routes: routes::route_table(),
            auth,
            posts,
            users,
            search,
        })
    }

    /// Run the startup validation pass over the stored accounts.
    pub async fn bootstrap(&self) -> Result<(), ClientError> {
        self.auth.bootstrap().await
    }

    /// Resolve the navigator's current path through the route tree and
    /// the auth gates.
    pub fn resolve_current(&self) -> Resolution {
        routes::resolve(&self.routes, &self.navigator.current(), &self.auth.user().get())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn routes(&self) -> &RouteTable<Page> {
        &self.routes
    }

    pub fn auth(&self) -> &Arc<AuthService> {
        &self.auth
    }

    pub fn posts(&self) -> &Arc<PostsService> {
        &self.posts
    }

    pub fn users(&self) -> &Arc<UsersService> {
        &self.users
    }

    pub fn search(&self) -> &Arc<SearchService> {
        &self.search
    }
}
