//! Decoder types and traits

use crate::error::{Error, Result};
use serde_json::Value;

/// Trait for decoding response bodies into records
pub trait RecordDecoder: Send + Sync {
    /// Extract records from an already-parsed response body
    fn extract(&self, body: &Value) -> Result<Vec<Value>>;

    /// Parse a raw response body and extract its records
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let value: Value = serde_json::from_str(body).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })?;
        self.extract(&value)
    }
}
