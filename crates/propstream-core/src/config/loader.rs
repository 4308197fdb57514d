//! File and environment configuration loading

use super::defaults::env as env_keys;
use super::stream_config::StreamConfig;
use crate::error::{StreamError, StreamResult};
use std::fs;
use std::path::Path;

/// Load configuration from a file
///
/// TOML is selected by a `.toml` extension, JSON otherwise.
/// Returns the default config if the file doesn't exist.
pub fn load_from_file(path: &Path) -> StreamResult<StreamConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(StreamConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        StreamError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    let config = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| {
            StreamError::config_with_context(
                format!("Failed to parse TOML config: {}", e),
                format!("Deserializing TOML configuration from '{}'", path.display()),
            )
        })?,
        _ => serde_json::from_str(&content).map_err(|e| {
            StreamError::config_with_context(
                format!("Failed to parse JSON config: {}", e),
                format!("Deserializing JSON configuration from '{}'", path.display()),
            )
        })?,
    };

    Ok(config)
}

/// Load configuration from `PROPSTREAM_*` environment variables on top of defaults
pub fn load_from_env() -> StreamResult<StreamConfig> {
    let mut config = StreamConfig::default();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables
pub fn apply_env_overrides<F>(config: &mut StreamConfig, lookup: F) -> StreamResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(env_keys::MAX_CHUNK_RETRIES) {
        config.max_chunk_retries = parse_count(env_keys::MAX_CHUNK_RETRIES, &value)?;
    }

    if let Some(value) = lookup(env_keys::MAX_REQUEST_RETRIES) {
        config.max_request_retries = parse_count(env_keys::MAX_REQUEST_RETRIES, &value)?;
    }

    if let Some(level) = lookup(env_keys::LOG_LEVEL) {
        config.logging.level = level;
    }

    if let Some(format) = lookup(env_keys::LOG_FORMAT) {
        config.logging.format = format;
    }

    Ok(())
}

/// Resolve the full configuration: defaults, then `path` if given, then environment
pub fn load_config(path: Option<&Path>) -> StreamResult<StreamConfig> {
    let mut config = match path {
        Some(path) => load_from_file(path)?,
        None => StreamConfig::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

fn parse_count(key: &str, value: &str) -> StreamResult<u32> {
    value.trim().parse().map_err(|_| {
        StreamError::config_with_context(format!("Invalid {} value: '{}'", key, value), key)
    })
}
