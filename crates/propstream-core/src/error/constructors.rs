//! Constructor methods for StreamError

use super::types::StreamError;

/// Message carried by every exhausted-retry decode failure
pub(crate) const DECODE_EXHAUSTED_MESSAGE: &str = "failed to parse JSON after multiple chunks";

impl StreamError {
    /// Create a new transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            url: None,
            status_code: None,
        }
    }

    /// Create a transport error for an HTTP response with a failing status
    pub fn http_status(url: impl Into<String>, status_code: u16) -> Self {
        let url = url.into();
        Self::Transport {
            message: format!("HTTP {} from {}", status_code, url),
            url: Some(url),
            status_code: Some(status_code),
        }
    }

    /// Create an error from an upstream `error:` line
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Create the terminal decode error raised once the retry budget is spent
    pub fn decode_exhausted(attempts: u32) -> Self {
        Self::Decode {
            message: DECODE_EXHAUSTED_MESSAGE.to_string(),
            attempts,
        }
    }

    /// Create a new JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
            context: None,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
        }
    }

    /// Create an IO error with path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
        }
    }

    /// Create an invalid input error naming the offending field
    pub fn invalid_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}
