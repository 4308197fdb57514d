//! Pull-based JSON value stream over a retried byte source

use super::decoder::FrameDecoder;
use crate::config::DecoderOptions;
use crate::error::{StreamError, StreamResult, UnifiedError};
use futures::{Stream, StreamExt};
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt::Display;
use std::future::Future;
use tracing::instrument;

/// Decoder session state carried across pulls
enum Session<F, S> {
    /// Byte source not opened yet
    Unopened(F),
    /// Reading chunks; `ready` holds values decoded but not yet handed out
    Open {
        upstream: S,
        decoder: FrameDecoder,
        ready: VecDeque<Value>,
    },
    /// End of stream reached and flushed
    Closed,
}

/// Decode a `text/event-stream` byte source into JSON values.
///
/// Nothing happens until the first pull: the source is opened then (retried
/// up to `max_request_retries` extra times) and chunks are read only when
/// the consumer asks for the next value and none is buffered.
///
/// The upstream stream is owned by the returned stream and dropped on every
/// exit path: end of input, a terminal error, or the consumer dropping the
/// stream early. Values decoded ahead of a terminal error are yielded before
/// it, whatever the chunking; after the error the stream yields nothing further.
pub fn json_stream<F, Fut, S, B, E>(
    open: F,
    options: DecoderOptions,
) -> impl Stream<Item = StreamResult<Value>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = StreamResult<S>>,
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Display,
{
    futures::stream::try_unfold(Session::Unopened(open), move |session| {
        pull(session, options)
    })
}

/// [`json_stream`] with `transform` applied to every decoded value.
///
/// A transform error is yielded in place of the value; decoding carries on
/// with the next frame.
pub fn json_stream_with<F, Fut, S, B, E, T, M>(
    open: F,
    options: DecoderOptions,
    mut transform: M,
) -> impl Stream<Item = StreamResult<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = StreamResult<S>>,
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Display,
    M: FnMut(Value) -> StreamResult<T>,
{
    json_stream(open, options).map(move |item| item.and_then(&mut transform))
}

/// Advance the session until it yields a value, ends or fails
async fn pull<F, Fut, S, B, E>(
    mut session: Session<F, S>,
    options: DecoderOptions,
) -> StreamResult<Option<(Value, Session<F, S>)>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = StreamResult<S>>,
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Display,
{
    loop {
        session = match session {
            Session::Unopened(mut open) => {
                let upstream = open_with_retry(&mut open, options.max_request_retries).await?;
                tracing::debug!("event stream opened");
                Session::Open {
                    upstream,
                    decoder: FrameDecoder::new(options),
                    ready: VecDeque::new(),
                }
            }
            Session::Open {
                mut upstream,
                mut decoder,
                mut ready,
            } => {
                if let Some(value) = ready.pop_front() {
                    return Ok(Some((
                        value,
                        Session::Open {
                            upstream,
                            decoder,
                            ready,
                        },
                    )));
                }

                if let Some(error) = decoder.take_error() {
                    return Err(error);
                }

                match upstream.next().await {
                    Some(Ok(chunk)) => {
                        ready.extend(decoder.feed(chunk.as_ref())?);
                        Session::Open {
                            upstream,
                            decoder,
                            ready,
                        }
                    }
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "reading event stream failed");
                        return Err(StreamError::transport(format!("Stream read failed: {}", e)));
                    }
                    None => {
                        drop(upstream);
                        tracing::debug!("event stream ended");
                        let last = decoder.finish()?;
                        return Ok(last.map(|value| (value, Session::Closed)));
                    }
                }
            }
            Session::Closed => return Ok(None),
        };
    }
}

/// Open a byte source, retrying transient failures without backoff.
///
/// `max_retries` counts extra attempts after the first. Errors that are not
/// retryable (see [`UnifiedError::is_retryable`]) are returned immediately.
#[instrument(skip(open))]
pub async fn open_with_retry<F, Fut, S>(mut open: F, max_retries: u32) -> StreamResult<S>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = StreamResult<S>>,
{
    let mut last_error = None;

    for attempt in 0..=max_retries {
        match open().await {
            Ok(source) => {
                if attempt > 0 {
                    tracing::info!(attempt, "stream opened after retry");
                }
                return Ok(source);
            }
            Err(error) => {
                if !error.is_retryable() {
                    tracing::warn!(error = %error, "non-retryable error opening stream");
                    return Err(error);
                }

                if attempt < max_retries {
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_attempts = max_retries + 1,
                        error = %error,
                        "opening stream failed, retrying"
                    );
                } else {
                    tracing::error!(attempts = max_retries + 1, error = %error, "all open attempts exhausted");
                }
                last_error = Some(error);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        StreamError::transport(format!(
            "All {} open attempts failed without error details",
            max_retries + 1
        ))
    }))
}
