//! Configuration Management
//!
//! Loads client settings from config files and environment variables.

mod settings;

pub use settings::{ApiSettings, Settings, StorageSettings};
