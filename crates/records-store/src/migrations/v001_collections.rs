//! v001 -- Four top-level collections.
//!
//! Ensures `citizens`, `documents`, `requests` and `archives` all exist as
//! arrays. A collection key holding anything other than an array is reset to
//! an empty array, the same way an insert into it always has been.

use records_shared::constants::COLLECTIONS;
use serde_json::{Map, Value};

pub fn up(document: &mut Map<String, Value>) -> Result<bool, String> {
    let mut changed = false;

    for key in COLLECTIONS {
        match document.get(key) {
            Some(Value::Array(_)) => {}
            Some(other) => {
                tracing::warn!(
                    collection = key,
                    found = json_kind(other),
                    "collection is not an array, replacing with an empty one"
                );
                document.insert(key.to_string(), Value::Array(Vec::new()));
                changed = true;
            }
            None => {
                document.insert(key.to_string(), Value::Array(Vec::new()));
                changed = true;
            }
        }
    }

    Ok(changed)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
