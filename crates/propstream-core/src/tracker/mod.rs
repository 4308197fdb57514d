//! Component stream tracking
//!
//! A [`ComponentTracker`] receives the raw JSON text of one component's
//! props as the model emits it, re-parses the growing prefix with a
//! [`PartialJsonParser`](crate::partial_json::PartialJsonParser) and emits
//! root-level JSON patches plus a per-property streaming status.
//!
//! [`TrackerRegistry`] is the caller-side map from component id to tracker.

mod component;
mod diff;
mod patch;
mod registry;
mod status;

pub use component::ComponentTracker;
pub use diff::{diff_props, is_complete};
pub use patch::{PatchKind, PatchOp};
pub use registry::{TrackerRegistry, UNKNOWN_COMPONENT_NAME};
pub use status::{PropStatus, StatusMap};

#[cfg(test)]
mod tests;
