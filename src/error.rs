//! Error types for exercise-validator
//!
//! Two layers of errors live here:
//! - [`Error`] is returned by fallible crate APIs (configuration loading,
//!   client construction, username format checks)
//! - [`FetchError`] classifies why a single username could not be resolved.
//!   It never escapes the fetcher as a failure; it is folded into an
//!   `error`-status [`ValidationResult`](crate::types::ValidationResult) and
//!   its `Display` text becomes the result's details.

use thiserror::Error;

/// Result type alias for exercise-validator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for exercise-validator
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "batching.anonymous.batch_size")
        key: Option<String>,
    },

    /// Username does not follow the account naming rule
    #[error("invalid username: {0}")]
    InvalidUsername(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error tied to a specific key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

/// Why a single username could not be resolved to a completion status
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Empty or blank username reached the fetcher
    #[error("Invalid username")]
    InvalidUsername,

    /// Direct fetch answered 403
    #[error("API rate limit exceeded")]
    RateLimited,

    /// Direct fetch answered 404
    #[error("Repository or README not found")]
    NotFound,

    /// Non-success status that the proxy fallback could not recover from
    #[error("HTTP error: {status}{}", if .reason.is_empty() { String::new() } else { format!(" {}", .reason) })]
    HttpStatus {
        /// HTTP status code of the direct request
        status: u16,
        /// Canonical reason phrase for the status
        reason: String,
    },

    /// Request never produced a response (DNS, connect, timeout, body read)
    #[error("{0}")]
    Transport(String),

    /// Proxy answered but its JSON envelope was unusable
    #[error("Invalid proxy response: {0}")]
    MalformedEnvelope(String),

    /// Run was cancelled before this username was checked
    #[error("Validation cancelled")]
    Cancelled,
}

impl FetchError {
    /// Returns true if this failure was caused by the remote rate limit
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, FetchError::RateLimited)
    }

    /// Build an [`FetchError::HttpStatus`] from a code, filling in the reason phrase
    pub fn http_status(status: u16) -> Self {
        FetchError::HttpStatus {
            status,
            reason: reason_phrase(status).to_string(),
        }
    }
}

/// Canonical reason phrase for an HTTP status code ("" if unknown)
pub(crate) fn reason_phrase(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
}
