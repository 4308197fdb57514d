//! Replay a recorded event stream from disk

use crate::sink::EventSink;
use anyhow::Context;
use propstream_core::config::DecoderOptions;
use propstream_core::error::StreamError;
use propstream_core::sse::json_stream;
use std::convert::Infallible;
use std::io::Write;
use std::path::Path;

/// Decode `file` in `chunk_size`-byte chunks and write events to `out`
pub async fn execute<W: Write>(
    file: &Path,
    chunk_size: usize,
    options: DecoderOptions,
    out: W,
) -> anyhow::Result<()> {
    if chunk_size == 0 {
        anyhow::bail!("--chunk-size must be at least 1");
    }

    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read '{}'", file.display()))?;

    tracing::info!(
        file = %file.display(),
        bytes = bytes.len(),
        chunk_size,
        "replaying event stream"
    );

    let chunks: Vec<Vec<u8>> = bytes.chunks(chunk_size).map(<[u8]>::to_vec).collect();
    let values = json_stream(
        move || {
            let chunks = chunks.clone();
            async move {
                Ok::<_, StreamError>(futures::stream::iter(
                    chunks.into_iter().map(Ok::<_, Infallible>),
                ))
            }
        },
        options,
    );

    let mut sink = EventSink::new(out);
    sink.drain(values).await
}
