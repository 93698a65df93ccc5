//! Domain error types
//!
//! This module defines the error hierarchy for Sonarex. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Sonarex error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum SonarexError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors (malformed dates, inverted ranges, bad filters)
    #[error("Validation error: {0}")]
    Validation(String),

    /// SonarQube API errors
    #[error("SonarQube error: {0}")]
    SonarApi(#[from] SonarApiError),

    /// Export process errors
    #[error("Export error: {0}")]
    Export(String),

    /// State management errors
    #[error("State management error: {0}")]
    State(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// SonarQube-specific errors
///
/// Errors that occur when talking to a SonarQube server. These carry the
/// retry classification used by the paginated fetcher: transient errors are
/// retried with backoff, fatal errors abort the project export immediately,
/// and malformed responses fail the current window without a retry.
#[derive(Debug, Error)]
pub enum SonarApiError {
    /// Failed to connect to the SonarQube server
    #[error("Failed to connect to SonarQube server: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Server-side or throttling error (429, 5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Authentication failed (401) - check the token
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Access denied (403) - check project permissions
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Project not found (404) - check the project key and server URL
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// Response body was not JSON or had an unexpected shape
    #[error("Malformed response from server: {0}")]
    MalformedResponse(String),

    /// Other client error (4xx outside the taxonomy above)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// All retry attempts for a page request were exhausted
    #[error("Retries exhausted after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },
}

impl SonarApiError {
    /// Whether this error may succeed on retry.
    ///
    /// Transient errors are network timeouts, connection failures, and the
    /// throttling/server statuses 429, 500, 502, 503, 504. Everything else
    /// is either fatal for the project or fails the window outright.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SonarApiError::ConnectionFailed(_)
                | SonarApiError::Timeout(_)
                | SonarApiError::ServerError { .. }
        )
    }

    /// Whether this error aborts the entire project export with no retry.
    ///
    /// Fatal errors are credential and addressing problems (401, 403, 404):
    /// retrying cannot help, and continuing to other windows would only
    /// repeat the failure.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SonarApiError::AuthenticationFailed(_)
                | SonarApiError::Forbidden(_)
                | SonarApiError::ProjectNotFound(_)
        )
    }

    /// Classify an HTTP status code into an API error.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => SonarApiError::AuthenticationFailed(message),
            403 => SonarApiError::Forbidden(message),
            404 => SonarApiError::ProjectNotFound(message),
            429 | 500 | 502 | 503 | 504 => SonarApiError::ServerError { status, message },
            _ => SonarApiError::ClientError { status, message },
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for SonarexError {
    fn from(err: std::io::Error) -> Self {
        SonarexError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SonarexError {
    fn from(err: serde_json::Error) -> Self {
        SonarexError::Serialization(err.to_string())
    }
}

// Conversion from csv::Error
impl From<csv::Error> for SonarexError {
    fn from(err: csv::Error) -> Self {
        SonarexError::Io(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SonarexError {
    fn from(err: toml::de::Error) -> Self {
        SonarexError::Configuration(format!("TOML parse error: {err}"))
    }
}
