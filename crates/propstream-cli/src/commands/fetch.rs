//! Decode a live event stream over HTTP

use crate::sink::EventSink;
use propstream_core::config::DecoderOptions;
use propstream_core::sse::{http::open_event_stream, json_stream};
use std::io::Write;

/// GET `url` and write the resulting events to `out`
pub async fn execute<W: Write>(url: &str, options: DecoderOptions, out: W) -> anyhow::Result<()> {
    tracing::info!(url, "fetching event stream");

    let client = reqwest::Client::new();
    let values = json_stream(|| open_event_stream(&client, url), options);

    let mut sink = EventSink::new(out);
    sink.drain(values).await
}
