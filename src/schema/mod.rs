//! Schema module
//!
//! Declarative field types for the resource schemas and their rendering
//! to JSON Schema.
//!
//! # Features
//!
//! - **Static Declarations**: `Field`/`FieldType` describe a schema as const data
//! - **Nullable Rendering**: every rendered property also admits `null`
//! - **Nested Objects and Arrays**: images, URLs, text objects, dates, prices

mod fields;
mod types;

pub use fields::{schema_for, string_fields, Field, FieldType};
pub use types::{JsonSchema, JsonType, JsonTypeOrArray, SchemaProperty};
