//! Error types for the PCO client
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Rate limiting never shows up as an error: the client waits and retries.

use thiserror::Error;

/// The main error type for the PCO client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid credentials: {message}")]
    Credentials { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Request Errors
    // ============================================================================
    /// The request never completed (DNS, connection reset, TLS, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// PCO answered with a non-2xx status other than 429
    #[error("PCO request failed: {message}")]
    Request {
        status: u16,
        message: String,
        body: String,
    },

    #[error("Request to '{url}' timed out after {attempts} attempt(s)")]
    Timeout { url: String, attempts: u32 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Response Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a credentials error
    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials {
            message: message.into(),
        }
    }

    /// Create a request error from a failed response
    pub fn request(status: u16, message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Request {
            status,
            message: message.into(),
            body: body.into(),
        }
    }

    /// Create an unexpected response error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            message: message.into(),
        }
    }

    /// HTTP status carried by a request error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Request { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw response body carried by a request error, if any
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Error::Request { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Result type alias for the PCO client
pub type Result<T> = std::result::Result<T, Error>;
