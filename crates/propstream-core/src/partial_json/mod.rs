//! Tolerant parsing of truncated JSON text
//!
//! Trackers only depend on the [`PartialJsonParser`] trait. [`ClosingParser`]
//! is the built-in implementation; any other best-effort parser can be
//! injected in its place.

mod closing;

pub use closing::ClosingParser;

use serde_json::Value;

/// Best-effort parser for a prefix of JSON text
#[cfg_attr(test, mockall::automock)]
pub trait PartialJsonParser: Send + Sync {
    /// Parse `text` as if every open string, array and object were closed.
    ///
    /// Returns `None` when the prefix cannot be recovered yet.
    fn parse_partial(&self, text: &str) -> Option<Value>;
}
