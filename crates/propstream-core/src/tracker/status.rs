//! Per-property streaming status

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Streaming status of one top-level property
///
/// Transitions: `Started -> Streaming | Done`, `Streaming -> Done`. `Done`
/// is terminal; a property that disappears from the props object loses its
/// entry instead of changing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropStatus {
    Started,
    Streaming,
    Done,
}

impl fmt::Display for PropStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "started"),
            Self::Streaming => write!(f, "streaming"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Status of every property present in the latest parsed props
pub type StatusMap = BTreeMap<String, PropStatus>;
