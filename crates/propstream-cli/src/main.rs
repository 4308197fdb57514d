//! Propstream CLI
//!
//! Reads a `text/event-stream` body from a file or an HTTP endpoint, routes
//! the decoded component envelopes to per-component trackers and prints
//! every resulting protocol event as one JSON line on stdout.
//!
//! ```bash
//! propstream replay recorded.sse --chunk-size 7
//! propstream fetch http://localhost:8080/stream
//! ```
//!
//! Logs go to stderr. Set `RUST_LOG=debug` (or pass `-v`) for verbose output.

mod args;
mod commands;
mod logging;
mod sink;

use args::{Cli, Commands};
use clap::Parser;
use propstream_core::config::load_config;
use std::io;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    logging::init(&config.logging, cli.verbose)?;

    tracing::debug!(?config, "configuration resolved");

    let options = config.decoder_options();
    let stdout = io::stdout();
    match cli.command {
        Commands::Replay { file, chunk_size } => {
            commands::replay::execute(&file, chunk_size, options, stdout).await
        }
        Commands::Fetch { url } => commands::fetch::execute(&url, options, stdout).await,
    }
}
