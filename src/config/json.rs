//! JSON document loading and flattening

use crate::error::FoggError;
use crate::system::System;
use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Ordered key -> string mapping flattened from a JSON object
pub type PropertyMap = BTreeMap<String, String>;

/// Read and parse a JSON document
///
/// # Errors
///
/// Returns a parse error naming the path if:
/// - The file cannot be read
/// - The content is not valid JSON
#[inline]
pub fn load_json(system: &dyn System, path: &Path) -> Result<Value> {
    let content = system.read_to_string(path).map_err(|e| {
        FoggError::parse(format!("Failed to read {}: {e}", path.display()))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        FoggError::parse(format!("Invalid JSON in {}: {e}", path.display())).into()
    })
}

/// Flatten an object's properties into an ordered mapping
///
/// Non-string values are rendered with [`value_to_string`]. Anything that is
/// not an object yields an empty mapping.
#[must_use]
#[inline]
pub fn to_property_map(value: Option<&Value>) -> PropertyMap {
    let Some(Value::Object(map)) = value else {
        return PropertyMap::new();
    };

    map.iter()
        .map(|(key, value)| (key.clone(), value_to_string(value)))
        .collect()
}

/// Convert a JSON value to its string form
#[must_use]
#[inline]
pub fn value_to_string(value: &Value) -> String {
    match *value {
        Value::String(ref s) => s.clone(),
        Value::Number(ref n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
        Value::Null => String::new(),
    }
}
