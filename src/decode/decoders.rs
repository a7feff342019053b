//! Decoder implementations

use super::types::RecordDecoder;
use crate::error::{Error, Result};
use serde_json::Value;

/// Location of the result array in every list response
pub const RECORDS_PATH: &str = "$.data.results[*]";

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder with record path extraction
#[derive(Debug, Clone)]
pub struct JsonDecoder {
    /// Path to the record array
    record_path: String,
}

impl Default for JsonDecoder {
    fn default() -> Self {
        Self::with_path(RECORDS_PATH)
    }
}

impl JsonDecoder {
    /// Create a decoder for the standard `data.results` envelope
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: path.into(),
        }
    }

    /// The configured record path
    pub fn record_path(&self) -> &str {
        &self.record_path
    }
}

impl RecordDecoder for JsonDecoder {
    fn extract(&self, body: &Value) -> Result<Vec<Value>> {
        let path = self.record_path.trim_end_matches("[*]");
        match lookup_path(body, path) {
            Some(Value::Array(records)) => Ok(records.clone()),
            Some(other) => Err(Error::RecordExtraction {
                path: self.record_path.clone(),
                message: format!("expected an array, found {}", type_name(other)),
            }),
            None => Err(Error::RecordExtraction {
                path: self.record_path.clone(),
                message: "path not present in response".to_string(),
            }),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Follow a dot-separated path (optionally prefixed with `$.`) into a value
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    path.split('.').try_fold(value, |current, part| current.get(part))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
