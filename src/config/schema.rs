//! JSON Schema validation for Foggfiles

use crate::error::FoggError;
use anyhow::{Result, anyhow};
use jsonschema::Validator;
use serde_json::Value;

/// Get the embedded JSON schema for Foggfiles
pub fn get_schema() -> Result<Validator> {
    let schema_str = include_str!("../../docs/foggfile.schema.json");
    let schema: Value = serde_json::from_str(schema_str)
        .map_err(|e| anyhow!("Failed to parse embedded JSON schema: {e}"))?;

    jsonschema::draft7::new(&schema).map_err(|e| anyhow!("Failed to compile JSON schema: {e}"))
}

/// Validate a Foggfile document against the schema
///
/// # Errors
///
/// Returns a parse error listing every schema violation
pub fn validate_against_schema(document: &Value, origin: &str) -> Result<()> {
    let schema = get_schema()?;

    let error_messages: Vec<String> = schema
        .iter_errors(document)
        .map(|e| format!("  - {e}"))
        .collect();

    if !error_messages.is_empty() {
        return Err(FoggError::parse(format!(
            "Foggfile {origin} does not match the expected structure:\n{}",
            error_messages.join("\n")
        ))
        .into());
    }

    Ok(())
}
