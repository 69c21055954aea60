//! Auth tokens and the multi-account token list.
//!
//! The client keeps one opaque bearer token per logged-in account in an
//! ordered list; index 0 is the primary (active) account. The list is
//! persisted as a JSON array and mutated only by login (prepend), account
//! selection (promote), and stale-session pruning.

use serde::{Deserialize, Serialize};

use super::{Session, User};

/// Opaque bearer token for one account.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AuthToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl From<String> for AuthToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

// Tokens are credentials: log output only ever gets a short prefix.
impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.0.chars().take(4).collect();
        write!(f, "AuthToken({}…)", prefix)
    }
}

/// One fully-validated account: its token plus the latest session and user
/// snapshots from the validate endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub token: AuthToken,
    pub session: Session,
    pub user: User,
}

/// Ordered, duplicate-free token sequence; index 0 is the primary token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenList {
    tokens: Vec<AuthToken>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw tokens, dropping duplicates (first occurrence wins).
    pub fn from_tokens(tokens: Vec<AuthToken>) -> Self {
        let mut list = Self::new();
        for token in tokens {
            if !list.tokens.contains(&token) {
                list.tokens.push(token);
            }
        }
        list
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The active account's token, if any account is stored.
    pub fn primary(&self) -> Option<&AuthToken> {
        self.tokens.first()
    }

    pub fn get(&self, index: usize) -> Option<&AuthToken> {
        self.tokens.get(index)
    }

    pub fn tokens(&self) -> &[AuthToken] {
        &self.tokens
    }

    /// Insert a token at the front. An already-stored equal token is moved
    /// to the front instead, keeping the list duplicate-free.
    pub fn prepend(&mut self, token: AuthToken) {
        self.tokens.retain(|existing| *existing != token);
        self.tokens.insert(0, token);
    }

    /// Move the token at `index` to the front. Returns false when the index
    /// is out of range; promoting index 0 is a no-op that returns true.
    pub fn promote(&mut self, index: usize) -> bool {
        if index >= self.tokens.len() {
            return false;
        }
        let token = self.tokens.remove(index);
        self.tokens.insert(0, token);
        true
    }

    /// Remove an exact token. Returns whether it was present.
    pub fn remove(&mut self, token: &AuthToken) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|existing| existing != token);
        self.tokens.len() != before
    }

    /// Keep only tokens accepted by the predicate, preserving relative
    /// order of the remainder.
    pub fn retain(&mut self, keep: impl FnMut(&AuthToken) -> bool) {
        self.tokens.retain(keep);
    }
}
