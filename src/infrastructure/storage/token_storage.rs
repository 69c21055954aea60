//! Token list persistence.
//!
//! The multi-account token list survives restarts as a JSON array in a
//! single file (the equivalent of the browser's `tokens` storage key).
//! The trait keeps the auth store independent of where the bytes live;
//! tests use the in-memory implementation.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::TokenList;
use crate::shared::error::ClientError;

/// Storage seam for the persisted token list.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Load the stored list; a missing store reads as an empty list.
    async fn load(&self) -> Result<TokenList, ClientError>;

    /// Replace the stored list.
    async fn save(&self, tokens: &TokenList) -> Result<(), ClientError>;
}

/// File-backed storage under the platform data directory.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<data dir>/plaatbook/tokens.json`, e.g. `~/.local/share/plaatbook/`
    /// on Linux.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("plaatbook")
            .join("tokens.json")
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl TokenStorage for FileTokenStorage {
    async fn load(&self) -> Result<TokenList, ClientError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(TokenList::new()),
            Err(error) => Err(error.into()),
        }
    }

    async fn save(&self, tokens: &TokenList) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec(tokens)?).await?;
        Ok(())
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    tokens: Mutex<TokenList>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start pre-seeded, as if earlier runs had logged in.
    pub fn with_tokens(tokens: TokenList) -> Self {
        Self {
            tokens: Mutex::new(tokens),
        }
    }
}

#[async_trait]
impl TokenStorage for MemoryTokenStorage {
    async fn load(&self) -> Result<TokenList, ClientError> {
        Ok(self.tokens.lock().clone())
    }

    async fn save(&self, tokens: &TokenList) -> Result<(), ClientError> {
        *self.tokens.lock() = tokens.clone();
        Ok(())
    }
}
