//! Core error types for neonflow-core.
//!
//! Engine commands never surface these: collaborator failures are logged and
//! swallowed by the effect dispatcher. They are returned by collaborator
//! implementations, configuration loading and settings validation.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for neonflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Durable store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Notification scheduler errors
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Durable key-value store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Store is locked")]
    Locked,

    /// A mutex guarding the backend was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    Poisoned,

    /// Backend cannot be reached at all
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Notification scheduler errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The platform refused to schedule the notification
    #[error("Failed to schedule notification in {after_secs}s: {message}")]
    ScheduleFailed { after_secs: u64, message: String },

    /// Cancelling pending notifications failed
    #[error("Failed to cancel notifications: {0}")]
    CancelFailed(String),

    /// Notification permission has not been granted
    #[error("Notification permission not granted")]
    PermissionDenied,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// No data directory could be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Value must be strictly positive
    #[error("Invalid value for '{field}': must be greater than zero")]
    NotPositive { field: &'static str },

    /// Unrecognised token for an enumerated field
    #[error("Unknown {field} '{value}'")]
    UnknownToken { field: &'static str, value: String },

    /// Free text was empty after trimming
    #[error("'{field}' must not be empty")]
    Empty { field: &'static str },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg) => {
                if code.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        StoreError::Poisoned
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
