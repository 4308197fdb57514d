//! Propstream Core Library
//!
//! Decodes a server-sent event stream of JSON frames and turns the growing
//! props text of generated UI components into start, props-delta and end
//! events carrying root-level JSON patches.

pub mod config;
pub mod error;
pub mod events;
pub mod partial_json;
pub mod sse;
pub mod tracker;

// Re-export commonly used types
pub use config::{DecoderOptions, LoggingConfig, StreamConfig, load_config};
pub use error::{StreamError, StreamResult, UnifiedError};
pub use events::{ComponentEvent, EventKind};
pub use partial_json::{ClosingParser, PartialJsonParser};
pub use sse::{FrameDecoder, json_stream, json_stream_with, open_with_retry};
pub use tracker::{ComponentTracker, PatchKind, PatchOp, PropStatus, StatusMap, TrackerRegistry};
