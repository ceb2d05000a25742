//! Domain error types
//!
//! This module defines the error hierarchy for notion-diary. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main notion-diary error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum DiaryError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Notion API errors
    #[error("Notion error: {0}")]
    Notion(#[from] NotionError),

    /// A remote call failed on every attempt allowed by the retry policy
    #[error("Remote call '{operation}' failed after {attempts} attempts: {source}")]
    RemoteCallExhausted {
        /// Name of the remote operation
        operation: String,
        /// Number of attempts made
        attempts: usize,
        /// Last underlying failure
        source: Box<DiaryError>,
    },

    /// Remote data did not have the expected property kind
    #[error("Schema mismatch on record {record_id}: property '{field}' expected {expected}, found {actual}")]
    SchemaMismatch {
        /// Record the property belongs to
        record_id: String,
        /// Property name
        field: String,
        /// Expected property kind
        expected: String,
        /// Declared property kind, or "missing"
        actual: String,
    },

    /// Remote returned a partial or incomplete object where a full one was required
    #[error("Malformed remote response: {0}")]
    MalformedRemoteResponse(String),

    /// Watermark load/save failed
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    /// Content store write failed
    #[error("Content store error: {0}")]
    ContentStore(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DiaryError {
    /// Whether a retry of the failed operation may succeed
    ///
    /// Notion errors defer to [`NotionError::is_transient`]. Schema, shape,
    /// configuration and validation failures are terminal. Anything else is
    /// treated as retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            DiaryError::Notion(e) => e.is_transient(),
            DiaryError::SchemaMismatch { .. }
            | DiaryError::MalformedRemoteResponse(_)
            | DiaryError::Configuration(_)
            | DiaryError::Validation(_)
            | DiaryError::RemoteCallExhausted { .. } => false,
            DiaryError::PersistenceFailure(_)
            | DiaryError::ContentStore(_)
            | DiaryError::Io(_)
            | DiaryError::Serialization(_) => true,
        }
    }
}

/// Notion API errors
///
/// Errors that occur when talking to the Notion REST API.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum NotionError {
    /// Failed to connect to the Notion API
    #[error("Failed to connect to Notion API: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Token rejected (401/403)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Object not found or not shared with the integration (404)
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// Malformed request or other 4xx
    #[error("Client error: {status} {code} - {message}")]
    ClientError {
        /// HTTP status
        status: u16,
        /// Notion error code
        code: String,
        /// Notion error message
        message: String,
    },

    /// Transaction conflict (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Rate limit exceeded (429)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError {
        /// HTTP status
        status: u16,
        /// Response message
        message: String,
    },

    /// Response body could not be decoded
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

impl NotionError {
    /// Whether the failure is transient and worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            NotionError::ConnectionFailed(_)
                | NotionError::Timeout(_)
                | NotionError::Conflict(_)
                | NotionError::RateLimited(_)
                | NotionError::ServerError { .. }
        )
    }
}

impl From<std::io::Error> for DiaryError {
    fn from(err: std::io::Error) -> Self {
        DiaryError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DiaryError {
    fn from(err: serde_json::Error) -> Self {
        DiaryError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for DiaryError {
    fn from(err: toml::de::Error) -> Self {
        DiaryError::Configuration(format!("TOML parse error: {err}"))
    }
}
