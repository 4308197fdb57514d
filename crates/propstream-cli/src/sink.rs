//! Routes decoded values to trackers and prints protocol events

use futures::{Stream, StreamExt};
use propstream_core::error::{StreamError, StreamResult, UnifiedError};
use propstream_core::tracker::TrackerRegistry;
use serde_json::{Value, json};
use std::io::Write;

/// Writes one JSON line per protocol event (or unroutable value) to `out`
pub struct EventSink<W: Write> {
    registry: TrackerRegistry,
    out: W,
}

impl<W: Write> EventSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            registry: TrackerRegistry::new(),
            out,
        }
    }

    /// Handle one decoded stream value
    pub fn handle(&mut self, value: Value) -> anyhow::Result<()> {
        match self.registry.route(&value) {
            Ok(events) => {
                for event in events {
                    self.write_line(&event)?;
                }
                Ok(())
            }
            Err(StreamError::InvalidInput { message, .. }) => {
                tracing::debug!(reason = %message, "value is not a component envelope");
                self.write_line(&json!({"type": "value", "value": value}))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Finalize every component still open
    pub fn finish(&mut self) -> anyhow::Result<()> {
        for event in self.registry.finish_all() {
            self.write_line(&event)?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Consume `values`, finalizing open components at the end.
    ///
    /// Open components are also finalized when the stream fails, before the
    /// error is returned.
    pub async fn drain<S>(&mut self, values: S) -> anyhow::Result<()>
    where
        S: Stream<Item = StreamResult<Value>>,
    {
        let mut values = std::pin::pin!(values);
        while let Some(item) = values.next().await {
            match item {
                Ok(value) => self.handle(value)?,
                Err(e) => {
                    tracing::error!(code = e.error_code(), error = %e, "event stream failed");
                    self.finish()?;
                    return Err(e.into());
                }
            }
        }
        self.finish()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line<T: serde::Serialize>(&mut self, item: &T) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.out, item)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}
