//! Server-Sent Events (SSE) frame decoding for component streams
//!
//! This module turns a chunked `text/event-stream` byte feed into a lazy
//! sequence of JSON values. It handles:
//! - Incomplete frames split across network chunks
//! - Incomplete UTF-8 sequences split across chunk boundaries
//! - Payloads that only become valid JSON after more frames arrive
//!   (bounded by a per-event retry budget)
//! - `DONE` sentinels and upstream `error:` lines
//! - Retrying the stream open before any byte has been received

mod decoder;
pub mod http;
mod line;
mod stream;
mod utf8;

pub use decoder::FrameDecoder;
pub use line::SseLine;
pub use stream::{json_stream, json_stream_with, open_with_retry};
