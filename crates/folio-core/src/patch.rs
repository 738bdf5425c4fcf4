//! Shallow field patches
//!
//! Records travel between the store and its callers as JSON objects. A patch
//! is a partial object whose keys overwrite the record's keys one level deep;
//! nested objects and arrays are replaced, not merged.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{FolioError, Result};

/// A JSON object holding some or all fields of a record
pub type Fields = Map<String, Value>;

/// Key holding a record's identity
pub const ID_KEY: &str = "id";

/// Merge `patch` over `target`, keeping `target`'s id
pub fn merge(target: &mut Fields, patch: &Fields) {
    for (key, value) in patch {
        if key == ID_KEY {
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}

/// Serialize a record into its field object
pub fn to_fields<T: Serialize>(record: &T) -> Result<Fields> {
    match serde_json::to_value(record)? {
        Value::Object(fields) => Ok(fields),
        other => Err(FolioError::Serialization(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Parse a JSON object from text
pub fn parse_fields(text: &str) -> Result<Fields> {
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(FolioError::Serialization(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
