//! JSON serialization wrapper functions.
//!
//! Thin wrappers around `serde_json` so callers see a single error type.
//! Records serialize through their own `Serialize` impl, which keeps
//! duplicate field names; converting a record into a `serde_json::Value`
//! does not.
use crate::error::{Result, SerdeError};
use serde::Serialize;

/// Serialize a value to a pretty-printed JSON string.
///
/// # Examples
///
/// ```
/// use cadence_serde::{Record, json::to_json_string_pretty};
///
/// let record = Record::new("user").with_id(7).text("username", "admin");
/// let json = to_json_string_pretty(&record)?;
/// assert!(json.contains("\"username\": \"admin\""));
/// # Ok::<(), cadence_serde::SerdeError>(())
/// ```
pub fn to_json_string_pretty<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    Ok(serde_json::to_string_pretty(value)?)
}

/// Parses `body` and requires the top-level value to be a JSON object.
pub fn parse_object(body: &str) -> Result<serde_json::Map<String, serde_json::Value>> {
    match serde_json::from_str(body)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(SerdeError::Custom(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
