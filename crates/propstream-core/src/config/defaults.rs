//! Default values for decoder retry budgets and logging.
//!
//! All of these can be overridden through [`StreamConfig`](super::StreamConfig).

/// Failed parse attempts tolerated for one pending event before giving up
pub const MAX_CHUNK_RETRIES: u32 = 5;

/// Extra attempts at opening the byte source before the failure propagates
pub const MAX_REQUEST_RETRIES: u32 = 2;

/// Default log level for the command-line sink
pub const LOG_LEVEL: &str = "info";

/// Default log format for the command-line sink
pub const LOG_FORMAT: &str = "pretty";

/// Environment variable names read by [`load_from_env`](super::load_from_env)
pub mod env {
    pub const MAX_CHUNK_RETRIES: &str = "PROPSTREAM_MAX_CHUNK_RETRIES";
    pub const MAX_REQUEST_RETRIES: &str = "PROPSTREAM_MAX_REQUEST_RETRIES";
    pub const LOG_LEVEL: &str = "PROPSTREAM_LOG_LEVEL";
    pub const LOG_FORMAT: &str = "PROPSTREAM_LOG_FORMAT";
}
