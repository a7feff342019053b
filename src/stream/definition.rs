//! Stream definition types

use super::catalog;
use crate::error::{Error, Result};
use crate::schema::{schema_for, string_fields, Field, JsonSchema};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

/// Bespoke post-processing applied after the shared normalization steps
pub type PostProcessHook = fn(&mut JsonObject) -> Result<()>;

/// Static description of one resource type
#[derive(Debug, Clone, Copy)]
pub struct StreamDefinition {
    /// Stream name, also the state key
    pub name: &'static str,
    /// Request path below the API root
    pub path: &'static str,
    /// Primary key fields
    pub primary_key: &'static [&'static str],
    /// Replication cursor field
    pub replication_key: &'static str,
    /// Flat output schema
    pub fields: &'static [Field],
    /// Fields holding `{"items": [<reference>, ...]}`
    pub list_entities_to_unpack: &'static [&'static str],
    /// Fields holding `[<reference>, ...]`
    pub entities_to_unpack: &'static [&'static str],
    /// Resource-specific singular reference resolution
    pub post_process: Option<PostProcessHook>,
}

impl StreamDefinition {
    /// JSON Schema of the emitted records
    pub fn json_schema(&self) -> JsonSchema {
        schema_for(self.fields)
    }

    /// Fields coerced to strings during post-processing
    pub fn string_fields(&self) -> Vec<&'static str> {
        string_fields(self.fields)
    }
}

/// The six resource types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Characters,
    Comics,
    Creators,
    Events,
    Series,
    Stories,
}

impl Resource {
    /// All resources in sync order
    pub const ALL: [Resource; 6] = [
        Resource::Characters,
        Resource::Comics,
        Resource::Creators,
        Resource::Events,
        Resource::Series,
        Resource::Stories,
    ];

    /// Static definition for this resource
    pub fn definition(self) -> &'static StreamDefinition {
        match self {
            Resource::Characters => &catalog::CHARACTERS,
            Resource::Comics => &catalog::COMICS,
            Resource::Creators => &catalog::CREATORS,
            Resource::Events => &catalog::EVENTS,
            Resource::Series => &catalog::SERIES,
            Resource::Stories => &catalog::STORIES,
        }
    }

    /// Stream name
    pub fn name(self) -> &'static str {
        self.definition().name
    }

    /// Look a resource up by stream name
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.name() == name)
            .ok_or_else(|| Error::stream_not_found(name))
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A post-processed record, ready for the sink
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Stream the record belongs to
    pub stream: &'static str,
    /// Normalized fields
    pub data: JsonObject,
}

impl Record {
    /// Create a record
    pub fn new(stream: &'static str, data: JsonObject) -> Self {
        Self { stream, data }
    }

    /// Integer primary key
    pub fn id(&self) -> Option<i64> {
        self.data.get("id").and_then(JsonValue::as_i64)
    }

    /// Value of a string field
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(JsonValue::as_str)
    }
}
