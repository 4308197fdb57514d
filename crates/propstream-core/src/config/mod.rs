//! Configuration for the decoder and the command-line sink
//!
//! Values are resolved in layers: built-in defaults, then an optional
//! TOML/JSON file, then `PROPSTREAM_*` environment variables.

pub mod defaults;
mod loader;
mod logging_config;
mod stream_config;

pub use loader::{apply_env_overrides, load_config, load_from_env, load_from_file};
pub use logging_config::LoggingConfig;
pub use stream_config::{DecoderOptions, StreamConfig};
