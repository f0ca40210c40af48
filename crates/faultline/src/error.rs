//! Error types for faultline.
//!
//! This module defines the error type shared by the configuration, API,
//! and workflow layers. Provider failures have their own error type in
//! [`crate::provider`] and are wrapped here when they cross into the core.

use thiserror::Error;

use crate::provider::ProviderError;

/// The main error type for faultline operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === API Errors ===
    /// The HTTP request itself failed (connect, DNS, TLS, timeout).
    #[error("API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    /// The API answered with a non-success status code.
    #[error("API returned {status}: {body}")]
    ApiStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body, kept for diagnostics.
        body: String,
    },

    // === Provider Errors ===
    /// A location or camera provider failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    // === Payload Errors ===
    /// A photo payload was not a self-contained data URI.
    #[error("invalid photo payload: {message}")]
    InvalidPhoto {
        /// What was wrong with the payload.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for faultline operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create an API status error from a response.
    #[must_use]
    pub fn api_status(status: u16, body: impl Into<String>) -> Self {
        Self::ApiStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an invalid photo payload error.
    #[must_use]
    pub fn invalid_photo(message: impl Into<String>) -> Self {
        Self::InvalidPhoto {
            message: message.into(),
        }
    }

    /// Check if this error came from the HTTP transport, including timeouts.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiStatus { .. })
    }
}
