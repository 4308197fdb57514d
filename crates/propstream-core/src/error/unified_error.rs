//! UnifiedError trait implementation for StreamError

use super::types::{StreamError, UnifiedError};

impl UnifiedError for StreamError {
    fn error_code(&self) -> &str {
        match self {
            Self::Transport { .. } => "PROPSTREAM_TRANSPORT",
            Self::Upstream { .. } => "PROPSTREAM_UPSTREAM",
            Self::Decode { .. } => "PROPSTREAM_DECODE",
            Self::Json { .. } => "PROPSTREAM_JSON",
            Self::Config { .. } => "PROPSTREAM_CONFIG",
            Self::Io { .. } => "PROPSTREAM_IO",
            Self::InvalidInput { .. } => "PROPSTREAM_INVALID_INPUT",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Transport { message, .. } => message,
            Self::Upstream { message } => message,
            Self::Decode { message, .. } => message,
            Self::Json { message, .. } => message,
            Self::Config { message, .. } => message,
            Self::Io { message, .. } => message,
            Self::InvalidInput { message, .. } => message,
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::Json { context, .. } => context.as_deref(),
            Self::Config { context, .. } => context.as_deref(),
            Self::Io { path, .. } => path.as_deref(),
            Self::InvalidInput { field, .. } => field.as_deref(),
            Self::Transport { url, .. } => url.as_deref(),
            Self::Upstream { .. } | Self::Decode { .. } => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Self::Transport {
                status_code: Some(code),
                ..
            } => *code == 429 || *code >= 500,
            Self::Transport { .. } => true,
            _ => false,
        }
    }
}
