//! Push-fed SSE frame decoder producing whole JSON values

use super::line::{SseLine, is_done_body};
use super::utf8::Utf8Carry;
use crate::config::DecoderOptions;
use crate::error::{StreamError, StreamResult};
use serde_json::Value;

/// How hard a parse failure should be treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    /// More bytes may still arrive; failures spend retry budget
    Partial,
    /// End of stream; a failure is terminal
    Final,
}

/// Decoder session for one open stream
///
/// Event framing:
/// ```text
/// data: {"message":\n
/// data:  "hello"}\n
/// \n
/// ```
///
/// `data:` payloads accumulate until a blank line, then the concatenated
/// body is parsed as one JSON value. A body that does not parse yet is kept
/// and extended by the next event, up to `max_chunk_retries` failed
/// attempts in a row.
#[derive(Debug)]
pub struct FrameDecoder {
    max_chunk_retries: u32,
    utf8: Utf8Carry,
    /// Decoded text not yet terminated by `\n`
    buffer: String,
    /// `data:` payloads of the event being assembled
    pending: Vec<String>,
    chunk_retries: u32,
    /// Terminal error raised after values that were already returned
    failed: Option<StreamError>,
    /// Set once a terminal error has been raised; later input is ignored
    closed: bool,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new(DecoderOptions::default())
    }
}

impl FrameDecoder {
    pub fn new(options: DecoderOptions) -> Self {
        Self {
            max_chunk_retries: options.max_chunk_retries,
            utf8: Utf8Carry::default(),
            buffer: String::new(),
            pending: Vec::new(),
            chunk_retries: 0,
            failed: None,
            closed: false,
        }
    }

    /// Feed raw bytes and return every value completed by them, in order
    ///
    /// An `error:` line or an exhausted retry budget ends the session. If
    /// values were completed before the failing line in the same chunk, they
    /// are returned first and the error is held back: it is reported by
    /// [`take_error`](Self::take_error), the next `feed` or `finish`.
    pub fn feed(&mut self, chunk: &[u8]) -> StreamResult<Vec<Value>> {
        if let Some(error) = self.failed.take() {
            return Err(error);
        }
        if self.closed {
            return Ok(Vec::new());
        }

        let text = self.utf8.decode(chunk);
        self.buffer.push_str(&text);

        let mut values = Vec::new();
        while let Some(newline) = self.buffer.find('\n') {
            let mut line: String = self.buffer.drain(..=newline).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }

            match self.consume_line(&line, Severity::Partial) {
                Ok(Some(value)) => values.push(value),
                Ok(None) => {}
                Err(error) => return self.fail(values, error),
            }
        }

        Ok(values)
    }

    /// Flush the session at end of stream
    ///
    /// Any unterminated trailing text is treated as a final line and any
    /// pending payload gets one last parse attempt, which must succeed.
    pub fn finish(mut self) -> StreamResult<Option<Value>> {
        if let Some(error) = self.failed.take() {
            return Err(error);
        }
        if self.closed {
            return Ok(None);
        }

        let tail = self.utf8.flush();
        self.buffer.push_str(&tail);

        if !self.buffer.is_empty() {
            let mut line = std::mem::take(&mut self.buffer);
            if line.ends_with('\r') {
                line.pop();
            }
            if let Some(value) = self.consume_line(&line, Severity::Final)? {
                return Ok(Some(value));
            }
        }

        self.terminate(Severity::Final)
    }

    /// Terminal error held back behind values returned by the last `feed`
    pub fn take_error(&mut self) -> Option<StreamError> {
        self.failed.take()
    }

    /// Whether the session ended with a terminal error
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of buffered `data:` lines waiting for a parse
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Consecutive failed parse attempts for the pending event
    pub fn chunk_retries(&self) -> u32 {
        self.chunk_retries
    }

    /// Whether a multi-byte UTF-8 sequence is split at the last chunk boundary
    pub fn has_incomplete_utf8(&self) -> bool {
        self.utf8.has_incomplete()
    }

    /// Text received after the last newline
    pub fn remaining(&self) -> &str {
        &self.buffer
    }

    fn consume_line(&mut self, line: &str, severity: Severity) -> StreamResult<Option<Value>> {
        match SseLine::classify(line) {
            SseLine::Blank => self.terminate(severity),
            SseLine::Done => {
                tracing::trace!("DONE sentinel");
                self.reset_pending();
                Ok(None)
            }
            SseLine::Error(message) => {
                tracing::error!(upstream_message = message, "upstream sent error line");
                Err(StreamError::upstream(message))
            }
            SseLine::Data(payload) => {
                self.pending.push(payload.to_string());
                Ok(None)
            }
            SseLine::Other => {
                tracing::trace!(line, "ignoring non-data line");
                Ok(None)
            }
        }
    }

    /// Attempt to parse the pending event body
    fn terminate(&mut self, severity: Severity) -> StreamResult<Option<Value>> {
        if self.pending.is_empty() {
            return Ok(None);
        }

        let body = self.pending.concat();
        if is_done_body(&body) {
            tracing::trace!("DONE event");
            self.reset_pending();
            return Ok(None);
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(value) => {
                self.reset_pending();
                Ok(Some(value))
            }
            Err(e) => {
                self.chunk_retries += 1;

                if severity == Severity::Final || self.chunk_retries > self.max_chunk_retries {
                    tracing::error!(
                        attempts = self.chunk_retries,
                        max_retries = self.max_chunk_retries,
                        final_flush = severity == Severity::Final,
                        error = %e,
                        "giving up on pending event"
                    );
                    return Err(StreamError::decode_exhausted(self.chunk_retries));
                }

                tracing::debug!(
                    attempt = self.chunk_retries,
                    max_retries = self.max_chunk_retries,
                    error = %e,
                    "pending event is not valid JSON yet, waiting for more data"
                );
                Ok(None)
            }
        }
    }

    fn fail(&mut self, values: Vec<Value>, error: StreamError) -> StreamResult<Vec<Value>> {
        self.closed = true;
        self.buffer.clear();
        self.reset_pending();

        if values.is_empty() {
            return Err(error);
        }
        tracing::debug!(
            delivered = values.len(),
            "holding back terminal error behind decoded values"
        );
        self.failed = Some(error);
        Ok(values)
    }

    fn reset_pending(&mut self) {
        self.pending.clear();
        self.chunk_retries = 0;
    }
}
