//! Resource streams
//!
//! One generic [`ResourceStream`] serves all six resource types. What
//! differs between them (path, schema, which reference fields to flatten,
//! and an optional bespoke post-processing step) lives in a static
//! [`StreamDefinition`] from the [`catalog`].
//!
//! # Overview
//!
//! - `definition` - `StreamDefinition`, `Record`, the `Resource` enum
//! - `catalog` - the six resource definitions
//! - `normalize` - entity-reference flattening and value repair
//! - `resource` - request construction, pagination and lazy record production

pub mod catalog;
mod definition;
mod normalize;
mod resource;

pub use definition::{PostProcessHook, Record, Resource, StreamDefinition};
pub use normalize::{
    coerce_string_fields, extract_id_from_entity, id_from_uri, parse_timestamp, post_process,
    repair_modified, resolve_optional_references, resolve_reference, unpack_entities,
    unpack_list_entities,
};
pub use resource::ResourceStream;
