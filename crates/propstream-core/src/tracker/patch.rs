//! Root-level JSON Patch operations

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchKind {
    Add,
    Replace,
    Remove,
}

/// A JSON Patch operation whose path is always a single root segment.
///
/// Changes nested inside a property replace the whole property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOp {
    pub op: PatchKind,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOp {
    pub fn add(key: &str, value: Value) -> Self {
        Self {
            op: PatchKind::Add,
            path: pointer_for(key),
            value: Some(value),
        }
    }

    pub fn replace(key: &str, value: Value) -> Self {
        Self {
            op: PatchKind::Replace,
            path: pointer_for(key),
            value: Some(value),
        }
    }

    pub fn remove(key: &str) -> Self {
        Self {
            op: PatchKind::Remove,
            path: pointer_for(key),
            value: None,
        }
    }

    /// Property key addressed by this operation
    pub fn key(&self) -> String {
        let segment = self.path.strip_prefix('/').unwrap_or(&self.path);
        segment.replace("~1", "/").replace("~0", "~")
    }
}

/// RFC 6901 pointer for a root-level key
fn pointer_for(key: &str) -> String {
    format!("/{}", key.replace('~', "~0").replace('/', "~1"))
}
