//! Declarative field definitions
//!
//! Resource schemas are written as `&'static [Field]` so the catalog can
//! live in constants.

use super::types::{JsonSchema, JsonType, SchemaProperty};
use std::collections::BTreeMap;

/// Semantic type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Number,
    String,
    /// ISO-8601 string
    DateTime,
    Object(&'static [Field]),
    Array(&'static FieldType),
}

impl FieldType {
    /// Render this type as a (nullable) JSON Schema property
    pub fn to_property(&self) -> SchemaProperty {
        match self {
            FieldType::Integer => SchemaProperty::nullable(JsonType::Integer),
            FieldType::Number => SchemaProperty::nullable(JsonType::Number),
            FieldType::String => SchemaProperty::nullable(JsonType::String),
            FieldType::DateTime => {
                SchemaProperty::nullable(JsonType::String).with_format("date-time")
            }
            FieldType::Object(fields) => SchemaProperty::object(properties_of(fields)),
            FieldType::Array(items) => SchemaProperty::array(items.to_property()),
        }
    }
}

/// A named field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub field_type: FieldType,
}

impl Field {
    pub const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self { name, field_type }
    }
}

fn properties_of(fields: &[Field]) -> BTreeMap<String, SchemaProperty> {
    fields
        .iter()
        .map(|f| (f.name.to_string(), f.field_type.to_property()))
        .collect()
}

/// Build the JSON Schema document for a field list
pub fn schema_for(fields: &[Field]) -> JsonSchema {
    let mut schema = JsonSchema::new();
    for field in fields {
        schema.add_property(field.name, field.field_type.to_property());
    }
    schema
}

/// Top-level fields whose rendered type admits `string`, in declaration order
pub fn string_fields(fields: &[Field]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|f| f.field_type.to_property().is_string())
        .map(|f| f.name)
        .collect()
}
