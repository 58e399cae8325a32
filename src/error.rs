//! Error types for Titler
//!
//! This module defines the error types used throughout the crate,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Titler operations
///
/// Covers configuration loading, provider calls, title generation,
/// and the cache and storage collaborators.
#[derive(Error, Debug)]
pub enum TitlerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (API calls, bad responses, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Title generation exceeded its deadline
    #[error("Title generation timeout after {timeout_ms}ms")]
    TitleTimeout {
        /// The deadline that elapsed
        timeout_ms: u64,
    },

    /// Title generation failed inside the client
    #[error("Title generation error: {0}")]
    TitleGeneration(String),

    /// An in-flight operation observed its abort handle
    #[error("Operation cancelled")]
    Cancelled,

    /// Title cache errors
    #[error("Cache error: {0}")]
    Cache(String),

    /// Conversation storage errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// SQLite errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type alias for Titler operations
///
/// Uses `anyhow::Error` as the error type so call sites can attach context
/// while still carrying a `TitlerError` underneath.
pub type Result<T> = anyhow::Result<T>;
