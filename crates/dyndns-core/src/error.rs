//! Error types for the dynamic DNS updater
//!
//! This module defines all error types used throughout the workspace.

use thiserror::Error;

/// Result type alias for updater operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the dynamic DNS updater
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing key, unreadable file, invalid value)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network errors (IP echo service or provider call did not complete)
    #[error("Network error: {0}")]
    Network(String),

    /// DNS resolution of the record name failed
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// Provider lookup returned an empty result list
    #[error("Lookup returned no results: {0}")]
    LookupEmpty(String),

    /// Log directory read, stat or delete failure
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error (non-success HTTP status, malformed envelope)
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create an empty lookup error
    pub fn lookup_empty(msg: impl Into<String>) -> Self {
        Self::LookupEmpty(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this error was raised before any network call was made
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
