mod config;
mod memory;
pub mod snapshot;
mod sqlite;

pub use config::{AppConfig, LoggingConfig, StorageConfig};
pub use memory::MemoryStore;
pub use snapshot::{PersistedState, DEFAULT_STATE_KEY};
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use crate::error::{ConfigError, StoreError};

/// Durable string key-value store.
///
/// The backend is picked when the application is composed; the engine only
/// sees this trait. Calls may be slow, so the engine never makes them on the
/// mutation path except through the effect dispatcher.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Returns `~/.config/neonflow[-dev]/` based on NEONFLOW_ENV.
///
/// Set NEONFLOW_ENV=dev to use the development data directory, or
/// NEONFLOW_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("NEONFLOW_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("NEONFLOW_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("neonflow-dev")
            } else {
                base_dir.join("neonflow")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
