//! Per-component tracker state machine

use super::diff::diff_props;
use super::status::{PropStatus, StatusMap};
use crate::events::ComponentEvent;
use crate::partial_json::{ClosingParser, PartialJsonParser};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Tracks one streaming component instance.
///
/// Owns the accumulated props text, the last parsed props snapshot and the
/// status of every property. Instances share nothing with each other.
pub struct ComponentTracker {
    component_id: String,
    component_name: String,
    /// Append-only props text received so far
    raw: String,
    /// Props parsed at the last successful diff
    previous: Map<String, Value>,
    status: StatusMap,
    started: bool,
    finalized: bool,
    parser: Arc<dyn PartialJsonParser>,
}

impl fmt::Debug for ComponentTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentTracker")
            .field("component_id", &self.component_id)
            .field("component_name", &self.component_name)
            .field("raw_len", &self.raw.len())
            .field("status", &self.status)
            .field("started", &self.started)
            .field("finalized", &self.finalized)
            .finish_non_exhaustive()
    }
}

impl ComponentTracker {
    /// Create a tracker using the built-in [`ClosingParser`]
    pub fn new(component_id: impl Into<String>, component_name: impl Into<String>) -> Self {
        Self::with_parser(component_id, component_name, Arc::new(ClosingParser))
    }

    pub fn with_parser(
        component_id: impl Into<String>,
        component_name: impl Into<String>,
        parser: Arc<dyn PartialJsonParser>,
    ) -> Self {
        Self {
            component_id: component_id.into(),
            component_name: component_name.into(),
            raw: String::new(),
            previous: Map::new(),
            status: StatusMap::new(),
            started: false,
            finalized: false,
            parser,
        }
    }

    /// Append a chunk of props text and return the resulting events.
    ///
    /// The first call always yields `component.start`. A `props_delta` is
    /// emitted only when the re-parsed props differ from the last snapshot;
    /// text that does not parse into an object yet produces nothing.
    pub fn process_delta(&mut self, text: &str) -> Vec<ComponentEvent> {
        if self.finalized {
            tracing::warn!(
                component_id = %self.component_id,
                "ignoring delta for finalized component"
            );
            return Vec::new();
        }

        let mut events = Vec::new();
        self.ensure_started(&mut events);

        self.raw.push_str(text);

        let Some(Value::Object(current)) = self.parser.parse_partial(&self.raw) else {
            tracing::trace!(
                component_id = %self.component_id,
                raw_len = self.raw.len(),
                "props not parseable as an object yet"
            );
            return events;
        };

        let patch = diff_props(&self.previous, &current, &mut self.status);
        if !patch.is_empty() {
            tracing::trace!(
                component_id = %self.component_id,
                operations = patch.len(),
                "emitting props delta"
            );
            events.push(ComponentEvent::props_delta(
                self.component_id.clone(),
                patch,
                self.status.clone(),
            ));
        }

        self.previous = current;
        events
    }

    /// Close the component and return its `component.end` event.
    ///
    /// If the accumulated text no longer parses, the last good snapshot is
    /// used as the final props. Every tracked property becomes `Done`.
    /// Calling this twice yields no further events.
    pub fn finalize(&mut self) -> Vec<ComponentEvent> {
        if self.finalized {
            tracing::warn!(component_id = %self.component_id, "component already finalized");
            return Vec::new();
        }

        let mut events = Vec::new();
        self.ensure_started(&mut events);

        let final_props = match self.parser.parse_partial(&self.raw) {
            Some(Value::Object(props)) => props,
            _ => {
                tracing::debug!(
                    component_id = %self.component_id,
                    "final parse failed, using last snapshot"
                );
                self.previous.clone()
            }
        };

        for status in self.status.values_mut() {
            *status = PropStatus::Done;
        }

        tracing::debug!(
            component_id = %self.component_id,
            props = final_props.len(),
            "component stream ended"
        );

        self.previous = final_props.clone();
        self.finalized = true;
        events.push(ComponentEvent::end(self.component_id.clone(), final_props));
        events
    }

    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    pub fn status(&self) -> &StatusMap {
        &self.status
    }

    /// Props parsed at the last successful diff (or at finalize)
    pub fn props(&self) -> &Map<String, Value> {
        &self.previous
    }

    pub fn raw_text(&self) -> &str {
        &self.raw
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    fn ensure_started(&mut self, events: &mut Vec<ComponentEvent>) {
        if self.started {
            return;
        }
        self.started = true;
        tracing::debug!(
            component_id = %self.component_id,
            component_name = %self.component_name,
            "component stream started"
        );
        events.push(ComponentEvent::start(
            self.component_id.clone(),
            self.component_name.clone(),
        ));
    }
}
