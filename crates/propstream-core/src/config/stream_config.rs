//! Top-level configuration model

use super::defaults;
use super::logging_config::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Configuration shared by the decoder and the command-line sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Failed parse attempts tolerated per pending event
    pub max_chunk_retries: u32,
    /// Extra attempts at opening the byte source
    pub max_request_retries: u32,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            max_chunk_retries: defaults::MAX_CHUNK_RETRIES,
            max_request_retries: defaults::MAX_REQUEST_RETRIES,
            logging: LoggingConfig::default(),
        }
    }
}

impl StreamConfig {
    /// Merge another layer on top of this one
    pub fn merge(&mut self, other: StreamConfig) {
        self.max_chunk_retries = other.max_chunk_retries;
        self.max_request_retries = other.max_request_retries;
        self.logging.merge(other.logging);
    }

    /// Options consumed by the SSE frame decoder
    pub fn decoder_options(&self) -> DecoderOptions {
        DecoderOptions {
            max_chunk_retries: self.max_chunk_retries,
            max_request_retries: self.max_request_retries,
        }
    }
}

/// Retry budgets for one decoder session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    pub max_chunk_retries: u32,
    pub max_request_retries: u32,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        StreamConfig::default().decoder_options()
    }
}
