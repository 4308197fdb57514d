//! Propstream
//!
//! Streams the props of AI-generated UI components while the model is still
//! writing them: server-sent event frames are decoded into JSON values, and
//! each component's growing props text becomes a sequence of
//! `component.start`, `component.props_delta` and `component.end` events.
//!
//! This crate re-exports [`propstream_core`]; see its modules for details.

pub use propstream_core::*;
