//! Error types for propstream
//!
//! Every fallible operation in the crate returns [`StreamResult`]. All errors
//! implement [`UnifiedError`], which exposes a stable error code and tells the
//! caller whether retrying the operation can help.

mod constructors;
mod conversions;
mod types;
mod unified_error;

pub use types::{StreamError, StreamResult, UnifiedError};
