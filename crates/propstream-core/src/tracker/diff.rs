//! Top-level diff between two props snapshots

use super::patch::PatchOp;
use super::status::{PropStatus, StatusMap};
use serde_json::{Map, Value};

/// Whether a value looks finished.
///
/// Scalars (strings and `null` included) are always complete; arrays and
/// objects are complete when all their members are. This cannot tell a
/// string that finished streaming from one that will still grow, so in
/// practice every parsed value counts as complete.
pub fn is_complete(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().all(is_complete),
        Value::Object(members) => members.values().all(is_complete),
        _ => true,
    }
}

/// Diff two props objects, updating `status` and returning the patch.
///
/// Only root keys are compared; a changed key is replaced wholesale. Keys
/// whose value is unchanged but which just became complete move from
/// `Streaming` to `Done` without a patch operation.
pub fn diff_props(
    previous: &Map<String, Value>,
    current: &Map<String, Value>,
    status: &mut StatusMap,
) -> Vec<PatchOp> {
    let mut patch = Vec::new();

    for (key, value) in current {
        let complete = is_complete(value);
        match previous.get(key) {
            None => {
                patch.push(PatchOp::add(key, value.clone()));
                let next = if complete { PropStatus::Done } else { PropStatus::Started };
                status.insert(key.clone(), next);
            }
            Some(old) if old != value => {
                patch.push(PatchOp::replace(key, value.clone()));
                // Done is terminal
                let was_done = status.get(key) == Some(&PropStatus::Done);
                let next = if complete || was_done { PropStatus::Done } else { PropStatus::Streaming };
                status.insert(key.clone(), next);
            }
            Some(_) => {
                if complete && status.get(key) == Some(&PropStatus::Streaming) {
                    status.insert(key.clone(), PropStatus::Done);
                }
            }
        }
    }

    for key in previous.keys() {
        if !current.contains_key(key) {
            patch.push(PatchOp::remove(key));
            status.remove(key);
        }
    }

    patch
}
