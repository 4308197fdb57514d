//! Protocol events consumed by the rendering sink
//!
//! Each component stream produces exactly one `component.start`, zero or
//! more `component.props_delta` and exactly one `component.end`, in that
//! order. Events serialize as tagged JSON records:
//!
//! ```json
//! {"type":"component.props_delta","componentId":"c1",
//!  "patch":[{"op":"add","path":"/title","value":"hello"}],
//!  "streamingStatus":{"title":"done"},"timestamp":1700000000000}
//! ```

use crate::tracker::{PatchOp, StatusMap};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event emitted by a component tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ComponentEvent {
    #[serde(rename = "component.start", rename_all = "camelCase")]
    Start {
        component_id: String,
        component_name: String,
        /// Milliseconds since the Unix epoch
        timestamp: i64,
    },

    #[serde(rename = "component.props_delta", rename_all = "camelCase")]
    PropsDelta {
        component_id: String,
        patch: Vec<PatchOp>,
        streaming_status: StatusMap,
        timestamp: i64,
    },

    #[serde(rename = "component.end", rename_all = "camelCase")]
    End {
        component_id: String,
        final_props: Map<String, Value>,
        /// UI state associated with the component; never populated here
        final_state: Option<Value>,
        timestamp: i64,
    },
}

/// Discriminant of a [`ComponentEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Start,
    PropsDelta,
    End,
}

impl EventKind {
    /// Wire name of the event type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "component.start",
            Self::PropsDelta => "component.props_delta",
            Self::End => "component.end",
        }
    }
}

impl ComponentEvent {
    pub fn start(component_id: impl Into<String>, component_name: impl Into<String>) -> Self {
        Self::Start {
            component_id: component_id.into(),
            component_name: component_name.into(),
            timestamp: now_millis(),
        }
    }

    pub fn props_delta(
        component_id: impl Into<String>,
        patch: Vec<PatchOp>,
        streaming_status: StatusMap,
    ) -> Self {
        Self::PropsDelta {
            component_id: component_id.into(),
            patch,
            streaming_status,
            timestamp: now_millis(),
        }
    }

    pub fn end(component_id: impl Into<String>, final_props: Map<String, Value>) -> Self {
        Self::End {
            component_id: component_id.into(),
            final_props,
            final_state: None,
            timestamp: now_millis(),
        }
    }

    pub fn component_id(&self) -> &str {
        match self {
            Self::Start { component_id, .. }
            | Self::PropsDelta { component_id, .. }
            | Self::End { component_id, .. } => component_id,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::Start { .. } => EventKind::Start,
            Self::PropsDelta { .. } => EventKind::PropsDelta,
            Self::End { .. } => EventKind::End,
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            Self::Start { timestamp, .. }
            | Self::PropsDelta { timestamp, .. }
            | Self::End { timestamp, .. } => *timestamp,
        }
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
