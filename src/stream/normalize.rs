//! Record normalization
//!
//! The API returns references to related entities as objects carrying a
//! `resourceURI`. Records leave the connector with those references
//! flattened to integer ids, `modified` repaired where possible, and every
//! string-typed field holding a string.

use super::definition::StreamDefinition;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use tracing::warn;

/// Naive formats tried after RFC 3339; interpreted as UTC
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

// ============================================================================
// Entity references
// ============================================================================

/// Id encoded in the last path segment of a resource URI
///
/// `http://gateway.marvel.com/v1/public/comics/1699` yields `1699`.
pub fn id_from_uri(uri: &str) -> Option<i64> {
    uri.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

/// Id of an entity reference object
pub fn extract_id_from_entity(entity: &JsonValue) -> Option<i64> {
    entity
        .get("resourceURI")
        .and_then(JsonValue::as_str)
        .and_then(id_from_uri)
}

fn reference_id(field: &str, entity: &JsonValue) -> Result<i64> {
    extract_id_from_entity(entity).ok_or_else(|| {
        Error::entity_reference(field, format!("no integer id in resourceURI of {entity}"))
    })
}

fn ids_of(field: &str, entities: &[JsonValue]) -> Result<JsonValue> {
    entities
        .iter()
        .map(|e| reference_id(field, e).map(JsonValue::from))
        .collect::<Result<Vec<_>>>()
        .map(JsonValue::Array)
}

/// Replace `{"items": [<ref>, ...]}` fields with lists of ids
pub fn unpack_list_entities(row: &mut JsonObject, fields: &[&str]) -> Result<()> {
    for &field in fields {
        let items = row
            .get(field)
            .and_then(|v| v.get("items"))
            .and_then(JsonValue::as_array)
            .ok_or_else(|| {
                Error::entity_reference(field, "expected an object with an items list")
            })?;
        let ids = ids_of(field, items)?;
        row.insert(field.to_string(), ids);
    }
    Ok(())
}

/// Replace `[<ref>, ...]` fields with lists of ids
pub fn unpack_entities(row: &mut JsonObject, fields: &[&str]) -> Result<()> {
    for &field in fields {
        let entities = row
            .get(field)
            .and_then(JsonValue::as_array)
            .ok_or_else(|| Error::entity_reference(field, "expected a list of references"))?;
        let ids = ids_of(field, entities)?;
        row.insert(field.to_string(), ids);
    }
    Ok(())
}

/// Replace a required single reference with its id
pub fn resolve_reference(row: &mut JsonObject, field: &str) -> Result<()> {
    let entity = row
        .get(field)
        .ok_or_else(|| Error::entity_reference(field, "reference is missing"))?;
    let id = reference_id(field, entity)?;
    row.insert(field.to_string(), JsonValue::from(id));
    Ok(())
}

/// Replace single references with ids, leaving null or absent ones alone
pub fn resolve_optional_references(row: &mut JsonObject, fields: &[&str]) -> Result<()> {
    for &field in fields {
        match row.get(field) {
            None | Some(JsonValue::Null) => {}
            Some(entity) => {
                let id = reference_id(field, entity)?;
                row.insert(field.to_string(), JsonValue::from(id));
            }
        }
    }
    Ok(())
}

// ============================================================================
// Value repair
// ============================================================================

/// Parse an ISO-8601 timestamp as the API writes it
///
/// Accepts RFC 3339, the API's colon-less offsets (`2014-04-29T14:18:17-0400`),
/// naive date-times (taken as UTC) and bare dates.
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt);
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Check `modified` parses, logging and leaving the value untouched either way
pub fn repair_modified(row: &JsonObject, stream: &str) {
    if let Some(JsonValue::String(modified)) = row.get("modified") {
        if parse_timestamp(modified).is_none() {
            warn!(stream, modified = %modified, "Unparseable modified timestamp, leaving as-is");
        }
    }
}

/// Render present, non-null, non-string values of `fields` as strings
///
/// Numbers and booleans take their JSON text (`42` becomes `"42"`),
/// arrays and objects their compact JSON.
pub fn coerce_string_fields(row: &mut JsonObject, fields: &[&str]) {
    for &field in fields {
        match row.get_mut(field) {
            None | Some(JsonValue::Null | JsonValue::String(_)) => {}
            Some(other) => *other = JsonValue::String(other.to_string()),
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Normalize one raw record in place
///
/// Order: list references, direct references, timestamp repair, string
/// coercion, then the resource's own hook.
pub fn post_process(definition: &StreamDefinition, row: &mut JsonObject) -> Result<()> {
    unpack_list_entities(row, definition.list_entities_to_unpack)?;
    unpack_entities(row, definition.entities_to_unpack)?;
    repair_modified(row, definition.name);
    coerce_string_fields(row, &definition.string_fields());
    if let Some(hook) = definition.post_process {
        hook(row)?;
    }
    Ok(())
}
