//! v002 -- `attachedRequestId` → `requestId` on documents.
//!
//! Early builds stored a document's request link as `attachedRequestId`.
//! Any document that has the old field but no `requestId` (or a null one)
//! gets a copy of the value under `requestId`. The old field is left as it is.

use serde_json::{Map, Value};

const LEGACY_FIELD: &str = "attachedRequestId";
const FIELD: &str = "requestId";

pub fn up(document: &mut Map<String, Value>) -> Result<bool, String> {
    let documents = match document.get_mut("documents") {
        Some(Value::Array(documents)) => documents,
        _ => return Err("documents collection missing; v001 must run first".to_string()),
    };

    let mut backfilled = 0usize;
    for record in documents.iter_mut() {
        let Some(object) = record.as_object_mut() else {
            continue;
        };
        if !object.get(FIELD).map_or(true, Value::is_null) {
            continue;
        }
        if let Some(legacy) = object.get(LEGACY_FIELD).filter(|v| !v.is_null()).cloned() {
            object.insert(FIELD.to_string(), legacy);
            backfilled += 1;
        }
    }

    if backfilled > 0 {
        tracing::debug!(documents = backfilled, "backfilled requestId from attachedRequestId");
    }
    Ok(backfilled > 0)
}
