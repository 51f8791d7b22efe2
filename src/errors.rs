/*!
 * Error types for the seogen application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Validation failures are not errors: they are entries in a
 * `ValidationReport`. The types here cover provider failures (always
 * recovered by falling back to the stub generator) and the few hard faults.
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting or exhausted quota
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The request did not complete in time
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The provider rejected the request as malformed
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Closed set of provider-side failures that trigger a stub fallback.
///
/// The generator never looks at provider-specific error types, only at this
/// taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackTrigger {
    Auth,
    RateLimit,
    Timeout,
    Connection,
    BadRequest,
    Other,
}

impl std::fmt::Display for FallbackTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FallbackTrigger::Auth => "auth",
            FallbackTrigger::RateLimit => "rate_limit",
            FallbackTrigger::Timeout => "timeout",
            FallbackTrigger::Connection => "connection",
            FallbackTrigger::BadRequest => "bad_request",
            FallbackTrigger::Other => "other",
        };
        write!(f, "{}", name)
    }
}

impl ProviderError {
    /// Classify a non-success HTTP status into a provider error
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            400 | 404 | 413 | 422 => Self::BadRequest(message),
            408 | 504 => Self::Timeout(message),
            _ => Self::ApiError { status_code, message },
        }
    }

    /// Map a transport-level reqwest error onto the taxonomy
    pub fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if let Some(status) = error.status() {
            Self::from_status(status.as_u16(), error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }

    /// The fallback trigger this error maps to
    pub fn fallback_trigger(&self) -> FallbackTrigger {
        match self {
            Self::AuthenticationError(_) => FallbackTrigger::Auth,
            Self::RateLimitExceeded(_) => FallbackTrigger::RateLimit,
            Self::Timeout(_) => FallbackTrigger::Timeout,
            Self::ConnectionError(_) => FallbackTrigger::Connection,
            Self::BadRequest(_) => FallbackTrigger::BadRequest,
            Self::RequestFailed(_) | Self::ParseError(_) | Self::ApiError { .. } => {
                FallbackTrigger::Other
            }
        }
    }

    /// Whether repeating the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimitExceeded(_) | Self::Timeout(_) | Self::ConnectionError(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

/// Errors raised while setting up content validation
#[derive(Error, Debug)]
pub enum ContentError {
    /// The banned-word resource could not be read
    #[error("Failed to load banned words from {path}: {message}")]
    ResourceLoad {
        /// Path of the resource
        path: String,
        /// Underlying reason
        message: String,
    },

    /// Length window or repetition thresholds make no sense
    #[error("Invalid content policy: {0}")]
    InvalidPolicy(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error in the configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from content validation setup
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::File(format!("invalid JSON: {}", error))
    }
}
