//! Bracket-closing implementation of [`PartialJsonParser`]
//!
//! A minimal fallback so trackers work without extra dependencies. It is not
//! a full tolerant JSON parser; callers needing better recovery of truncated
//! text should inject their own [`PartialJsonParser`].

use super::PartialJsonParser;
use serde_json::Value;

/// Completes a JSON prefix by closing open strings and containers.
///
/// Two candidates are tried in order:
/// 1. the prefix as-is (an open value string closed at its last complete
///    character), followed by the missing closers;
/// 2. the prefix cut back to the last structural checkpoint (just after an
///    opening bracket or a closed container, or just before a `,`), followed
///    by the closers open at that point.
///
/// The second candidate drops dangling tails such as a key with no value,
/// a partial literal (`tr`) or a number ending in `-`, `.` or `e`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClosingParser;

impl PartialJsonParser for ClosingParser {
    fn parse_partial(&self, text: &str) -> Option<Value> {
        if let Ok(value) = serde_json::from_str(text) {
            return Some(value);
        }

        let scan = Scan::run(text)?;
        scan.candidates(text)
            .into_iter()
            .find_map(|candidate| serde_json::from_str(&candidate).ok())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Object,
    Array,
}

/// Scanner state at the end of the prefix
#[derive(Debug)]
struct Scan {
    stack: Vec<Frame>,
    in_string: bool,
    /// Whether the open string is an object key
    string_is_key: bool,
    /// Byte length of the prefix up to the last character not inside an escape
    safe_end: usize,
    /// Last prefix length that can be closed with the saved stack
    checkpoint: Option<(usize, Vec<Frame>)>,
}

impl Scan {
    /// Returns `None` for mismatched brackets, which no suffix can repair
    fn run(text: &str) -> Option<Self> {
        let mut scan = Scan {
            stack: Vec::new(),
            in_string: false,
            string_is_key: false,
            safe_end: 0,
            checkpoint: None,
        };
        let mut escape = false;
        // Inside an object, a string is a key until the following ':'
        let mut expect_key = false;

        for (i, c) in text.char_indices() {
            let end = i + c.len_utf8();

            if scan.in_string {
                if escape {
                    escape = false;
                } else if c == '\\' {
                    escape = true;
                    continue;
                } else if c == '"' {
                    scan.in_string = false;
                }
                scan.safe_end = end;
                continue;
            }

            match c {
                '"' => {
                    scan.in_string = true;
                    scan.string_is_key = expect_key;
                }
                '{' => {
                    scan.stack.push(Frame::Object);
                    expect_key = true;
                    scan.checkpoint = Some((end, scan.stack.clone()));
                }
                '[' => {
                    scan.stack.push(Frame::Array);
                    expect_key = false;
                    scan.checkpoint = Some((end, scan.stack.clone()));
                }
                '}' | ']' => {
                    let expected = if c == '}' { Frame::Object } else { Frame::Array };
                    if scan.stack.pop() != Some(expected) {
                        return None;
                    }
                    expect_key = false;
                    scan.checkpoint = Some((end, scan.stack.clone()));
                }
                ':' => expect_key = false,
                ',' => {
                    expect_key = scan.stack.last() == Some(&Frame::Object);
                    scan.checkpoint = Some((i, scan.stack.clone()));
                }
                _ => {}
            }
            scan.safe_end = end;
        }

        Some(scan)
    }

    fn candidates(&self, text: &str) -> Vec<String> {
        let mut candidates = Vec::with_capacity(2);

        if !self.in_string {
            candidates.push(close(text, &self.stack));
        } else if !self.string_is_key {
            let body = trim_partial_unicode_escape(&text[..self.safe_end]);
            candidates.push(close(&format!("{}\"", body), &self.stack));
        }

        if let Some((len, stack)) = &self.checkpoint {
            candidates.push(close(&text[..*len], stack));
        }

        candidates
    }
}

/// Append the closers for every open container, innermost first
fn close(prefix: &str, stack: &[Frame]) -> String {
    let mut out = String::with_capacity(prefix.len() + stack.len());
    out.push_str(prefix);
    out.extend(stack.iter().rev().map(|frame| match frame {
        Frame::Object => '}',
        Frame::Array => ']',
    }));
    out
}

/// Remove a `\u` escape with fewer than four hex digits from the end of a string body
fn trim_partial_unicode_escape(body: &str) -> &str {
    if let Some(pos) = body.rfind("\\u") {
        let digits = &body[pos + 2..];
        let preceding_backslashes = body[..pos].chars().rev().take_while(|&c| c == '\\').count();
        if preceding_backslashes % 2 == 0
            && digits.len() < 4
            && digits.chars().all(|c| c.is_ascii_hexdigit())
        {
            return &body[..pos];
        }
    }
    body
}
