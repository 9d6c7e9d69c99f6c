//! Core error types for timelog-core.
//!
//! Errors are grouped by the collaborator that produced them: the local
//! key-value store, the TOML configuration, the Notion API, or form
//! validation.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for timelog-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Local key-value store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Notion record store errors
    #[error("Notion error: {0}")]
    Notion(#[from] NotionError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// In-memory store mutex was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    Poisoned,
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),

    /// Home directory could not be resolved
    #[error("Could not determine the home directory")]
    NoHomeDir,

    /// OS keyring access failed
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Notion API errors.
#[derive(Error, Debug)]
pub enum NotionError {
    /// The API answered with a non-success status
    #[error("Notion API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// No API token available
    #[error("Notion token is not configured")]
    MissingToken,

    /// A page lacks a property the formatter relies on
    #[error("Page {page_id} is missing property '{property}'")]
    MissingProperty { page_id: String, property: String },

    /// The query returned no pages
    #[error("No records found")]
    NoRecords,
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is empty
    #[error("'{0}' is required")]
    Required(String),

    /// A field expected a number
    #[error("'{field}' must be a number, got '{value}'")]
    NotANumber { field: String, value: String },

    /// A number is on the wrong side of zero
    #[error("'{field}' must be {bound}")]
    OutOfRange { field: String, bound: String },

    /// A datetime field does not match `YYYY-MM-DDTHH:MM`
    #[error("'{field}' must look like YYYY-MM-DDTHH:MM, got '{value}'")]
    BadDateFormat { field: String, value: String },

    /// A select field holds a value outside its option list
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        CoreError::Notion(err.into())
    }
}

impl From<keyring::Error> for CoreError {
    fn from(err: keyring::Error) -> Self {
        CoreError::Config(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
