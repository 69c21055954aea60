//! Authentication Service
//!
//! The auth/session state store: maintains the set of logged-in accounts
//! (multi-account support) and exposes the active session, user, and token
//! as reactive cells the rest of the client renders from.
//!
//! Account lifecycle per stored token: unauthenticated -> validating ->
//! authenticated, or pruned when the server rejects the token. The derived
//! `AuthUser` cell is `Unknown` until the first validation pass completes,
//! `Anonymous` when no stored token survived, and `Authenticated` with the
//! primary account's user otherwise; pages gate rendering on this three-way
//! state so a logged-in user never sees a flash of the logged-out view
//! during startup.

use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::domain::{Account, AuthToken, Errors, Session, TokenList, User};
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::storage::TokenStorage;
use crate::presentation::router::Navigator;
use crate::shared::error::ClientError;
use crate::shared::generation::GenerationCounter;
use crate::shared::signal::Signal;

/// Three-way authenticated-user state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthUser {
    /// The initial validation pass has not completed yet
    #[default]
    Unknown,
    /// Validation completed with zero valid accounts
    Anonymous,
    /// The primary account's user record
    Authenticated(Box<User>),
}

impl AuthUser {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthUser::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            AuthUser::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// `POST /auth/login` response document.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: AuthToken,
    session: Session,
    user: User,
}

/// `GET /auth/validate` response document.
#[derive(Debug, Deserialize)]
struct ValidateResponse {
    session: Session,
    user: User,
}

/// Multi-account auth store.
///
/// The token list in durable storage is the source of truth; the in-memory
/// copy here mirrors it and is written back after every mutation. Cells are
/// only committed from [`refresh_accounts`](AuthService::refresh_accounts),
/// in one step after every validation settled.
pub struct AuthService {
    api: Arc<ApiClient>,
    storage: Arc<dyn TokenStorage>,
    navigator: Navigator,
    tokens: Mutex<TokenList>,
    user: Signal<AuthUser>,
    session: Signal<Option<Session>>,
    token: Signal<Option<AuthToken>>,
    accounts: Signal<Vec<Account>>,
    refreshes: GenerationCounter,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>, storage: Arc<dyn TokenStorage>, navigator: Navigator) -> Self {
        Self {
            api,
            storage,
            navigator,
            tokens: Mutex::new(TokenList::new()),
            user: Signal::new(AuthUser::Unknown),
            session: Signal::new(None),
            token: Signal::new(None),
            accounts: Signal::new(Vec::new()),
            refreshes: GenerationCounter::new(),
        }
    }

    /// The three-way auth state cell.
    pub fn user(&self) -> Signal<AuthUser> {
        self.user.clone()
    }

    /// The primary account's session cell.
    pub fn session(&self) -> Signal<Option<Session>> {
        self.session.clone()
    }

    /// The primary bearer token cell, shared with the resource services.
    pub fn token(&self) -> Signal<Option<AuthToken>> {
        self.token.clone()
    }

    /// All validated accounts, primary first.
    pub fn accounts(&self) -> Signal<Vec<Account>> {
        self.accounts.clone()
    }

    /// Load the persisted token list and run the initial validation pass.
    pub async fn bootstrap(&self) -> Result<(), ClientError> {
        let stored = self.storage.load().await?;
        info!(accounts = stored.len(), "Loaded stored tokens");
        *self.tokens.lock() = stored;
        self.refresh_accounts().await
    }

    /// Log in with a username-or-email identifier and password.
    ///
    /// When the identifier matches an account that is already stored, that
    /// account is promoted to primary instead of re-authenticating: the
    /// token list is reordered, and the `refresh_accounts` pass that
    /// selection runs revalidates it. Otherwise the credentials go to the
    /// API; on success the new token is prepended and persisted before all
    /// account snapshots are refreshed.
    ///
    /// `Ok(false)` means the server rejected the credentials; transport
    /// failures propagate as errors.
    pub async fn login(&self, logon: &str, password: &str) -> Result<bool, ClientError> {
        let existing = self
            .accounts
            .with(|accounts| accounts.iter().position(|a| a.user.matches_logon(logon)));
        if let Some(index) = existing {
            debug!(%logon, "Already logged in, promoting account");
            return self.select_token(index).await.map(|_| true);
        }

        let response = self
            .api
            .form::<LoginResponse>(
                Method::POST,
                "/auth/login",
                &[("logon", logon), ("password", password)],
                None,
            )
            .await;
        match response {
            Ok(login) => {
                info!(username = %login.user.username, "Logged in");
                {
                    self.tokens.lock().prepend(login.token);
                }
                self.persist().await?;
                self.refresh_accounts().await?;
                Ok(true)
            }
            Err(error) if error.is_rejection() => {
                debug!(%logon, "Login rejected");
                Ok(false)
            }
            Err(error) => Err(error),
        }
    }

    /// Register a new account. Returns the validation report on rejection.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<Errors>, ClientError> {
        let response = self
            .api
            .form::<User>(
                Method::POST,
                "/users",
                &[
                    ("username", username),
                    ("email", email),
                    ("password", password),
                ],
                None,
            )
            .await;
        match response {
            Ok(_) => Ok(None),
            Err(ClientError::Validation(errors)) => Ok(Some(errors)),
            Err(error) => Err(error),
        }
    }

    /// Validate every stored token against the API and rebuild the derived
    /// cells.
    ///
    /// One validation request is dispatched per token, concurrently; the
    /// pass waits for all of them, prunes the tokens the server rejected
    /// (preserving the order of the rest), persists the pruned list, and
    /// then commits the primary session/user/token and the accounts list
    /// without suspending in between, so observers never see a partially
    /// updated account set. A pass that has been superseded by a newer one
    /// commits nothing.
    ///
    /// Transport failures abort the pass without pruning anything: an
    /// unreachable server says nothing about token validity.
    pub async fn refresh_accounts(&self) -> Result<(), ClientError> {
        let pass = self.refreshes.begin();
        let snapshot: Vec<AuthToken> = self.tokens.lock().tokens().to_vec();

        let checks = snapshot.iter().map(|token| self.validate(token));
        let results = join_all(checks).await;

        if !pass.is_current() {
            debug!("Discarding superseded refresh pass");
            return Ok(());
        }

        let mut valid = Vec::new();
        let mut pruned = 0usize;
        for (token, outcome) in snapshot.into_iter().zip(results) {
            match outcome? {
                Some(validated) => valid.push(Account {
                    token,
                    session: validated.session,
                    user: validated.user,
                }),
                None => pruned += 1,
            }
        }
        if pruned > 0 {
            warn!(pruned, "Pruned stale sessions");
        }

        {
            let mut tokens = self.tokens.lock();
            tokens.retain(|token| valid.iter().any(|account| account.token == *token));
        }
        self.persist().await?;

        // Single commit point for all derived cells
        match valid.first() {
            Some(primary) => {
                self.token.set(Some(primary.token.clone()));
                self.session.set(Some(primary.session.clone()));
                self.user
                    .set(AuthUser::Authenticated(Box::new(primary.user.clone())));
            }
            None => {
                self.token.set(None);
                self.session.set(None);
                self.user.set(AuthUser::Anonymous);
            }
        }
        self.accounts.set(valid);
        Ok(())
    }

    /// Make the account at `index` primary and revalidate.
    ///
    /// Returns `Ok(false)` when the index does not refer to a stored token.
    pub async fn select_token(&self, index: usize) -> Result<bool, ClientError> {
        let moved = { self.tokens.lock().promote(index) };
        if !moved {
            return Ok(false);
        }
        self.persist().await?;
        self.refresh_accounts().await?;
        Ok(true)
    }

    /// Log the primary account out.
    ///
    /// The server-side session is invalidated best-effort; the token is
    /// removed locally either way. When no accounts remain afterwards the
    /// navigator is sent to the login page, also when there was nothing
    /// to log out of to begin with.
    pub async fn logout(&self) -> Result<(), ClientError> {
        if let Some(token) = self.primary_token() {
            if let Err(error) = self.api.send(Method::PUT, "/auth/logout", Some(&token)).await {
                warn!(%error, "Server-side logout failed");
            }
            {
                self.tokens.lock().remove(&token);
            }
            self.persist().await?;
        }
        self.refresh_accounts().await?;
        if self.accounts.with(Vec::is_empty) {
            self.navigator.navigate("/auth/login");
        }
        Ok(())
    }

    /// Revoke one of the authenticated user's sessions.
    ///
    /// Revoking the primary session is a logout; any other session is
    /// revoked remotely without touching the stored tokens of other
    /// accounts.
    pub async fn revoke_session(&self, session: &Session) -> Result<(), ClientError> {
        let is_primary = self
            .session
            .with(|current| current.as_ref().map(|s| s.id) == Some(session.id));
        if is_primary {
            return self.logout().await;
        }
        self.api
            .send(
                Method::DELETE,
                &format!("/sessions/{}", session.id),
                self.primary_token().as_ref(),
            )
            .await
    }

    /// List the primary account's active sessions.
    pub async fn sessions(&self) -> Result<Vec<Session>, ClientError> {
        let user = self.user.get();
        let Some(user) = user.user() else {
            return Err(ClientError::Unauthorized);
        };
        self.api
            .get(
                &format!("/users/{}/sessions", user.id),
                self.primary_token().as_ref(),
            )
            .await
    }

    /// Change the primary account's username and email.
    ///
    /// On success the user cell is updated in place; other profile fields
    /// are left as they were.
    pub async fn change_details(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<Errors>, ClientError> {
        let current = self.user.get();
        let Some(user) = current.user() else {
            return Err(ClientError::Unauthorized);
        };
        let response = self
            .api
            .form::<User>(
                Method::PUT,
                &format!("/users/{}", user.id),
                &[("username", username), ("email", email)],
                self.primary_token().as_ref(),
            )
            .await;
        match response {
            Ok(_) => {
                self.user.update(|state| {
                    if let AuthUser::Authenticated(user) = state {
                        user.username = username.to_string();
                        user.email = email.to_string();
                    }
                });
                self.accounts.update(|accounts| {
                    if let Some(primary) = accounts.first_mut() {
                        primary.user.username = username.to_string();
                        primary.user.email = email.to_string();
                    }
                });
                Ok(None)
            }
            Err(ClientError::Validation(errors)) => Ok(Some(errors)),
            Err(error) => Err(error),
        }
    }

    /// Change the primary account's password.
    pub async fn change_password(
        &self,
        current_password: &str,
        password: &str,
    ) -> Result<Option<Errors>, ClientError> {
        let current = self.user.get();
        let Some(user) = current.user() else {
            return Err(ClientError::Unauthorized);
        };
        let response = self
            .api
            .form::<serde_json::Value>(
                Method::PUT,
                &format!("/users/{}/change_password", user.id),
                &[
                    ("current_password", current_password),
                    ("password", password),
                ],
                self.primary_token().as_ref(),
            )
            .await;
        match response {
            Ok(_) => Ok(None),
            Err(ClientError::Validation(errors)) => Ok(Some(errors)),
            Err(error) => Err(error),
        }
    }

    fn primary_token(&self) -> Option<AuthToken> {
        self.tokens.lock().primary().cloned()
    }

    /// Check one token; `Ok(None)` means the server rejected it.
    async fn validate(&self, token: &AuthToken) -> Result<Option<ValidateResponse>, ClientError> {
        let response = self
            .api
            .get::<ValidateResponse>("/auth/validate", Some(token))
            .await;
        match response {
            Ok(validated) => Ok(Some(validated)),
            Err(error) if error.is_rejection() => Ok(None),
            Err(error) => Err(error),
        }
    }

    async fn persist(&self) -> Result<(), ClientError> {
        let snapshot = self.tokens.lock().clone();
        self.storage.save(&snapshot).await
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("accounts", &self.accounts.with(Vec::len))
            .finish()
    }
}
