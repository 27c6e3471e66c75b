// src/error.rs

//! Unified error handling for the dumper.

use std::fmt;

use thiserror::Error;

/// Result type alias for dumper operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Session missing, expired or rejected
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Remote response did not have the expected shape
    #[error("Unexpected response from {context}: {message}")]
    Parse { context: String, message: String },

    /// Remote API reported an error
    #[error("API error for {context}: {message}")]
    Api { context: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Site transform/build error
    #[error("Site error: {0}")]
    Site(String),
}

impl AppError {
    /// Create an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Create a response shape error with context.
    pub fn parse(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create an API error with context.
    pub fn api(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Api {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a site error.
    pub fn site(message: impl Into<String>) -> Self {
        Self::Site(message.into())
    }

    /// Whether another attempt could succeed.
    ///
    /// An expired credential or a broken configuration will not fix itself
    /// between attempts; everything else is treated as transient.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::Auth(_) | Self::Config(_) | Self::Validation(_) | Self::Site(_)
        )
    }

    /// Whether this error means the session is unusable.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}
