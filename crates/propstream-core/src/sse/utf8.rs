//! Streaming UTF-8 decoding that survives multi-byte sequences split across chunks

/// Carries incomplete trailing UTF-8 bytes from one chunk to the next.
///
/// Invalid sequences are replaced with U+FFFD rather than dropped, so a
/// corrupt byte never stalls the line buffer.
#[derive(Debug, Default)]
pub(crate) struct Utf8Carry {
    incomplete: Vec<u8>,
}

impl Utf8Carry {
    /// Decode `chunk`, prefixed by any bytes carried over from the previous call
    pub(crate) fn decode(&mut self, chunk: &[u8]) -> String {
        let bytes = if self.incomplete.is_empty() {
            chunk.to_vec()
        } else {
            let mut combined = std::mem::take(&mut self.incomplete);
            combined.extend_from_slice(chunk);
            combined
        };

        let mut out = String::with_capacity(bytes.len());
        let mut rest = bytes.as_slice();

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    // valid_up_to() guarantees this prefix is valid UTF-8
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());

                    match e.error_len() {
                        Some(bad) => {
                            tracing::warn!(bytes = bad, "replacing invalid UTF-8 sequence");
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[bad..];
                        }
                        None => {
                            // Truncated sequence at the end of the chunk
                            self.incomplete = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Flush carried bytes at end of stream; a truncated sequence becomes U+FFFD
    pub(crate) fn flush(&mut self) -> String {
        if self.incomplete.is_empty() {
            return String::new();
        }
        let tail = std::mem::take(&mut self.incomplete);
        String::from_utf8_lossy(&tail).into_owned()
    }

    pub(crate) fn has_incomplete(&self) -> bool {
        !self.incomplete.is_empty()
    }

    pub(crate) fn incomplete_len(&self) -> usize {
        self.incomplete.len()
    }
}
