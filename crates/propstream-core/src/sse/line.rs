//! Classification of a single `text/event-stream` line

/// Payload of a `data:` line that ends the stream without being parsed
const DONE_SENTINEL: &str = "DONE";

/// One complete line of the event stream, with any trailing `\r` removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseLine<'a> {
    /// Empty line: terminates the pending event
    Blank,
    /// Exactly `data: DONE`
    Done,
    /// `error: <message>`
    Error(&'a str),
    /// `data:<payload>` with a single leading space stripped from the payload
    Data(&'a str),
    /// Anything else (`event:`, `id:`, comments, ...)
    Other,
}

impl<'a> SseLine<'a> {
    pub fn classify(line: &'a str) -> Self {
        if line.trim().is_empty() {
            return Self::Blank;
        }

        if let Some(message) = line.strip_prefix("error: ") {
            return Self::Error(message);
        }

        if let Some(rest) = line.strip_prefix("data:") {
            let payload = rest.strip_prefix(' ').unwrap_or(rest);
            if payload == DONE_SENTINEL && rest.starts_with(' ') {
                return Self::Done;
            }
            return Self::Data(payload);
        }

        Self::Other
    }
}

/// Whether a terminated event body is the `DONE` sentinel
pub(crate) fn is_done_body(body: &str) -> bool {
    body.trim() == DONE_SENTINEL
}
