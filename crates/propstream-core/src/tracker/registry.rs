//! Caller-side routing of deltas to per-component trackers

use super::component::ComponentTracker;
use crate::error::{StreamError, StreamResult};
use crate::events::ComponentEvent;
use crate::partial_json::{ClosingParser, PartialJsonParser};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Name given to a component whose first envelope carries no name
pub const UNKNOWN_COMPONENT_NAME: &str = "unknown";

/// Routing envelope decoded from the event stream.
///
/// ```json
/// {"componentId": "c1", "componentName": "WeatherCard", "delta": "{\"city\":"}
/// {"componentId": "c1", "done": true}
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    component_id: String,
    #[serde(default)]
    component_name: Option<String>,
    #[serde(default)]
    delta: Option<String>,
    #[serde(default)]
    done: bool,
}

/// Owns one [`ComponentTracker`] per live component id.
///
/// Trackers are created on the first delta for an id and dropped once
/// their end event has been produced.
pub struct TrackerRegistry {
    trackers: HashMap<String, ComponentTracker>,
    parser: Arc<dyn PartialJsonParser>,
}

impl Default for TrackerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackerRegistry {
    pub fn new() -> Self {
        Self::with_parser(Arc::new(ClosingParser))
    }

    /// Create a registry whose trackers share `parser`
    pub fn with_parser(parser: Arc<dyn PartialJsonParser>) -> Self {
        Self {
            trackers: HashMap::new(),
            parser,
        }
    }

    /// Feed a delta to the tracker for `component_id`, creating it if needed
    pub fn process_delta(
        &mut self,
        component_id: &str,
        component_name: &str,
        text: &str,
    ) -> Vec<ComponentEvent> {
        let parser = &self.parser;
        self.trackers
            .entry(component_id.to_string())
            .or_insert_with(|| {
                ComponentTracker::with_parser(component_id, component_name, parser.clone())
            })
            .process_delta(text)
    }

    /// Finalize and drop the tracker for `component_id`
    ///
    /// Returns `None` if no tracker exists for that id.
    pub fn finish(&mut self, component_id: &str) -> Option<Vec<ComponentEvent>> {
        self.trackers
            .remove(component_id)
            .map(|mut tracker| tracker.finalize())
    }

    /// Finalize every live tracker in component id order
    pub fn finish_all(&mut self) -> Vec<ComponentEvent> {
        let mut trackers: Vec<_> = self.trackers.drain().collect();
        trackers.sort_by(|a, b| a.0.cmp(&b.0));
        trackers
            .into_iter()
            .flat_map(|(_, mut tracker)| tracker.finalize())
            .collect()
    }

    /// Route a decoded stream value shaped like a routing envelope
    pub fn route(&mut self, value: &Value) -> StreamResult<Vec<ComponentEvent>> {
        let envelope: Envelope = serde_json::from_value(value.clone()).map_err(|e| {
            StreamError::invalid_field(format!("Not a component envelope: {}", e), "componentId")
        })?;

        if envelope.delta.is_none() && !envelope.done {
            return Err(StreamError::invalid_field(
                format!(
                    "Envelope for '{}' carries neither delta nor done",
                    envelope.component_id
                ),
                "delta",
            ));
        }

        let name = envelope
            .component_name
            .as_deref()
            .unwrap_or(UNKNOWN_COMPONENT_NAME);

        let mut events = Vec::new();
        if let Some(delta) = &envelope.delta {
            events.extend(self.process_delta(&envelope.component_id, name, delta));
        }

        if envelope.done {
            match self.finish(&envelope.component_id) {
                Some(end) => events.extend(end),
                None => {
                    // Done for a component that never sent a delta
                    let mut tracker = ComponentTracker::with_parser(
                        envelope.component_id.clone(),
                        name,
                        self.parser.clone(),
                    );
                    events.extend(tracker.finalize());
                }
            }
        }

        Ok(events)
    }

    pub fn get(&self, component_id: &str) -> Option<&ComponentTracker> {
        self.trackers.get(component_id)
    }

    /// Ids of live trackers, sorted
    pub fn active_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.trackers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }
}
