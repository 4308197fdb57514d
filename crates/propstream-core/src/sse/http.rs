//! HTTP byte source for [`json_stream`](super::json_stream)

use crate::error::{StreamError, StreamResult};
use futures::Stream;
use tracing::instrument;

/// Issue a GET for `url` and return its body as a chunk stream.
///
/// A non-success status is reported as a transport error (retryable for 429
/// and 5xx only), so this can be handed straight to `json_stream` as the
/// opener:
///
/// ```no_run
/// # use propstream_core::{config::DecoderOptions, sse};
/// # async fn demo() {
/// let client = reqwest::Client::new();
/// let url = "http://localhost:8080/stream";
/// let values = sse::json_stream(
///     || sse::http::open_event_stream(&client, url),
///     DecoderOptions::default(),
/// );
/// # drop(values);
/// # }
/// ```
#[instrument(skip(client))]
pub async fn open_event_stream(
    client: &reqwest::Client,
    url: &str,
) -> StreamResult<impl Stream<Item = reqwest::Result<impl AsRef<[u8]>>> + Unpin + Send> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "text/event-stream")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(StreamError::http_status(url, status.as_u16()));
    }

    tracing::debug!(status = status.as_u16(), "event stream response received");
    Ok(Box::pin(response.bytes_stream()))
}
