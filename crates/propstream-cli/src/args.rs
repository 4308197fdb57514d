//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use propstream_core::config::StreamConfig;
use std::path::PathBuf;

/// Default number of bytes handed to the decoder per chunk on replay
pub const DEFAULT_CHUNK_SIZE: usize = 64;

#[derive(Debug, Parser)]
#[command(name = "propstream")]
#[command(about = "Stream generated UI component props as JSON patch events")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML or JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Failed JSON parses tolerated per pending event
    #[arg(long, global = true)]
    pub max_chunk_retries: Option<u32>,

    /// Extra attempts at opening the byte source
    #[arg(long, global = true)]
    pub max_request_retries: Option<u32>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decode a recorded event stream from a file
    Replay {
        /// File holding the raw `text/event-stream` body
        file: PathBuf,

        /// Bytes per chunk fed to the decoder
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },

    /// Decode a live event stream from an HTTP endpoint
    Fetch {
        /// URL answering a GET with `text/event-stream`
        url: String,
    },
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut StreamConfig) {
        if let Some(retries) = self.max_chunk_retries {
            config.max_chunk_retries = retries;
        }
        if let Some(retries) = self.max_request_retries {
            config.max_request_retries = retries;
        }
    }
}
