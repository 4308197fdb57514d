//! Core error types and traits for propstream

use thiserror::Error;

/// Result type alias for propstream operations
pub type StreamResult<T> = Result<T, StreamError>;

/// Unified error trait implemented by [`StreamError`].
///
/// - error_code(): unique code for programmatic error identification
/// - message(): human-readable error message
/// - context(): optional additional context
pub trait UnifiedError: std::error::Error + Send + Sync {
    /// Get the error code for programmatic handling
    fn error_code(&self) -> &str;

    /// Get the human-readable error message
    fn message(&self) -> &str;

    /// Get optional context about the error
    fn context(&self) -> Option<&str> {
        None
    }

    /// Check if this error is retryable
    fn is_retryable(&self) -> bool {
        false
    }
}

/// Main error type for propstream
#[derive(Error, Debug, Clone)]
pub enum StreamError {
    /// Opening the byte source or reading a chunk from it failed
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        url: Option<String>,
        status_code: Option<u16>,
    },

    /// The upstream sent an explicit `error:` line
    #[error("Upstream error: {message}")]
    Upstream { message: String },

    /// A frame payload never became valid JSON
    #[error("Decode error: {message}")]
    Decode {
        message: String,
        /// Number of failed parse attempts for the pending event
        attempts: u32,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        context: Option<String>,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// A value handed to the tracker router had an unexpected shape
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },
}
