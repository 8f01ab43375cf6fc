//! Error types for the Dexter client.

use thiserror::Error;

/// Result type for Dexter client operations.
pub type Result<T> = std::result::Result<T, DexterError>;

/// Dexter client errors.
#[derive(Debug, Error)]
pub enum DexterError {
    /// Base URL failed syntactic validation
    #[error("Malformed url: {0}")]
    InvalidUrl(String),

    /// Configuration error (missing or unparsable environment variable)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Non-2xx HTTP response
    #[error("HTTP error for {url} (status code {status}):\n\n{body}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },

    /// The service answered with an `{"error": ...}` payload
    #[error("Dexter error for {url}: {message}")]
    Service { url: String, message: String },

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Parse error (body is not JSON, or not the expected shape)
    #[error("Parse error: {0}")]
    Parse(String),

    /// A field the operation extracts is absent from the response
    #[error("Response from {endpoint} has no `{field}` field")]
    MissingField {
        endpoint: &'static str,
        field: &'static str,
    },
}

impl DexterError {
    /// HTTP status code, if this is a transport-level error.
    pub fn status(&self) -> Option<u16> {
        match self {
            DexterError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
