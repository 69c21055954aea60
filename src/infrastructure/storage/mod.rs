//! Durable client-side storage.

mod token_storage;

pub use token_storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};
