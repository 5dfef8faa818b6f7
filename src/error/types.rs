//! Error type definitions
//!
//! Defines the main error types used throughout the check-in application.

use thiserror::Error;

/// Main error type for the check-in tool
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timeout, connection or other HTTP client failures
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Unexpected status code or unparsable body
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Credentials rejected by the site
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// Expected page element missing
    #[error("Element not found: {selector}")]
    Scrape { selector: String },

    /// Notification dispatch failures
    #[error("Notification error: {0}")]
    Notify(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing errors
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create an authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a scrape error for a selector that matched nothing
    pub fn scrape(selector: impl Into<String>) -> Self {
        Self::Scrape {
            selector: selector.into(),
        }
    }

    /// Create a notification error
    pub fn notify(msg: impl Into<String>) -> Self {
        Self::Notify(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
