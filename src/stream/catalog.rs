//! The six resource definitions
//!
//! Every field is nullable in the emitted schema. Reference collections
//! (`comics`, `stories`, ...) are declared as integer arrays because
//! post-processing flattens them to ids before records leave the stream.

use super::definition::StreamDefinition;
use super::normalize::{resolve_optional_references, resolve_reference};
use crate::error::Result;
use crate::schema::{Field, FieldType};
use crate::types::JsonObject;

use FieldType::{Array, DateTime, Integer, Number, Object, String};

const PRIMARY_KEY: &[&str] = &["id"];
const REPLICATION_KEY: &str = "modified";

// ============================================================================
// Shared field types
// ============================================================================

/// `{path, extension}` image locator
pub const IMAGE_FIELDS: &[Field] = &[
    Field::new("path", String),
    Field::new("extension", String),
];

/// `{type, url}` link
pub const URL_FIELDS: &[Field] = &[Field::new("type", String), Field::new("url", String)];

const TEXT_OBJECT_FIELDS: &[Field] = &[
    Field::new("type", String),
    Field::new("language", String),
    Field::new("text", String),
];

const DATE_FIELDS: &[Field] = &[Field::new("type", String), Field::new("date", DateTime)];

const PRICE_FIELDS: &[Field] = &[Field::new("type", String), Field::new("price", Number)];

const IMAGE: FieldType = Object(IMAGE_FIELDS);
const IMAGES: FieldType = Array(&IMAGE);
const URLS: FieldType = Array(&Object(URL_FIELDS));
const IDS: FieldType = Array(&Integer);

// ============================================================================
// Characters
// ============================================================================

pub const CHARACTERS: StreamDefinition = StreamDefinition {
    name: "characters",
    path: "/characters",
    primary_key: PRIMARY_KEY,
    replication_key: REPLICATION_KEY,
    fields: &[
        Field::new("id", Integer),
        Field::new("name", String),
        Field::new("description", String),
        Field::new("modified", DateTime),
        Field::new("resourceURI", String),
        Field::new("thumbnail", IMAGE),
        Field::new("urls", URLS),
        Field::new("comics", IDS),
        Field::new("stories", IDS),
        Field::new("events", IDS),
        Field::new("series", IDS),
    ],
    list_entities_to_unpack: &["comics", "stories", "events", "series"],
    entities_to_unpack: &[],
    post_process: None,
};

// ============================================================================
// Comics
// ============================================================================

pub const COMICS: StreamDefinition = StreamDefinition {
    name: "comics",
    path: "/comics",
    primary_key: PRIMARY_KEY,
    replication_key: REPLICATION_KEY,
    fields: &[
        Field::new("id", Integer),
        Field::new("digitalId", Integer),
        Field::new("title", String),
        Field::new("issueNumber", Number),
        Field::new("variantDescription", String),
        Field::new("description", String),
        Field::new("modified", DateTime),
        Field::new("isbn", String),
        Field::new("upc", String),
        Field::new("diamondCode", String),
        Field::new("ean", String),
        Field::new("issn", String),
        Field::new("format", String),
        Field::new("pageCount", Integer),
        Field::new("textObjects", Array(&Object(TEXT_OBJECT_FIELDS))),
        Field::new("resourceURI", String),
        Field::new("urls", URLS),
        Field::new("series", Integer),
        Field::new("variants", IDS),
        Field::new("collections", IDS),
        Field::new("collectedIssues", IDS),
        Field::new("dates", Array(&Object(DATE_FIELDS))),
        Field::new("prices", Array(&Object(PRICE_FIELDS))),
        Field::new("thumbnail", IMAGE),
        Field::new("images", IMAGES),
        Field::new("creators", IDS),
        Field::new("characters", IDS),
        Field::new("stories", IDS),
        Field::new("events", IDS),
    ],
    list_entities_to_unpack: &["creators", "characters", "stories", "events"],
    entities_to_unpack: &["variants", "collections", "collectedIssues"],
    post_process: Some(comic_series),
};

/// Every comic belongs to exactly one series
fn comic_series(row: &mut JsonObject) -> Result<()> {
    resolve_reference(row, "series")
}

// ============================================================================
// Creators
// ============================================================================

pub const CREATORS: StreamDefinition = StreamDefinition {
    name: "creators",
    path: "/creators",
    primary_key: PRIMARY_KEY,
    replication_key: REPLICATION_KEY,
    fields: &[
        Field::new("id", Integer),
        Field::new("firstName", String),
        Field::new("middleName", String),
        Field::new("lastName", String),
        Field::new("suffix", String),
        Field::new("fullName", String),
        Field::new("modified", DateTime),
        Field::new("resourceURI", String),
        Field::new("urls", URLS),
        Field::new("thumbnail", IMAGE),
        Field::new("series", IDS),
        Field::new("stories", IDS),
        Field::new("comics", IDS),
        Field::new("events", IDS),
    ],
    list_entities_to_unpack: &["series", "comics", "stories", "events"],
    entities_to_unpack: &[],
    post_process: None,
};

// ============================================================================
// Events
// ============================================================================

pub const EVENTS: StreamDefinition = StreamDefinition {
    name: "events",
    path: "/events",
    primary_key: PRIMARY_KEY,
    replication_key: REPLICATION_KEY,
    fields: &[
        Field::new("id", Integer),
        Field::new("title", String),
        Field::new("description", String),
        Field::new("resourceURI", String),
        Field::new("urls", URLS),
        Field::new("modified", DateTime),
        Field::new("start", DateTime),
        Field::new("end", DateTime),
        Field::new("thumbnail", IMAGE),
        Field::new("comics", IDS),
        Field::new("stories", IDS),
        Field::new("series", IDS),
        Field::new("characters", IDS),
        Field::new("creators", IDS),
        Field::new("next", Integer),
        Field::new("previous", Integer),
    ],
    list_entities_to_unpack: &["comics", "stories", "series", "characters", "creators"],
    entities_to_unpack: &[],
    post_process: Some(neighbours),
};

/// `next` and `previous` are single references, either may be null
fn neighbours(row: &mut JsonObject) -> Result<()> {
    resolve_optional_references(row, &["next", "previous"])
}

// ============================================================================
// Series
// ============================================================================

pub const SERIES: StreamDefinition = StreamDefinition {
    name: "series",
    path: "/series",
    primary_key: PRIMARY_KEY,
    replication_key: REPLICATION_KEY,
    fields: &[
        Field::new("id", Integer),
        Field::new("title", String),
        Field::new("type", String),
        Field::new("description", String),
        Field::new("resourceURI", String),
        Field::new("urls", URLS),
        Field::new("startYear", Integer),
        Field::new("endYear", Integer),
        Field::new("rating", String),
        Field::new("modified", DateTime),
        Field::new("thumbnail", IMAGE),
        Field::new("comics", IDS),
        Field::new("stories", IDS),
        Field::new("events", IDS),
        Field::new("characters", IDS),
        Field::new("creators", IDS),
        Field::new("next", Integer),
        Field::new("previous", Integer),
    ],
    list_entities_to_unpack: &["comics", "stories", "events", "characters", "creators"],
    entities_to_unpack: &[],
    post_process: Some(neighbours),
};

// ============================================================================
// Stories
// ============================================================================

pub const STORIES: StreamDefinition = StreamDefinition {
    name: "stories",
    path: "/stories",
    primary_key: PRIMARY_KEY,
    replication_key: REPLICATION_KEY,
    fields: &[
        Field::new("id", Integer),
        Field::new("title", String),
        Field::new("description", String),
        Field::new("resourceURI", String),
        Field::new("type", String),
        Field::new("modified", DateTime),
        Field::new("thumbnail", IMAGE),
        Field::new("comics", IDS),
        Field::new("series", IDS),
        Field::new("events", IDS),
        Field::new("characters", IDS),
        Field::new("creators", IDS),
        Field::new("originalIssue", Integer),
    ],
    list_entities_to_unpack: &["comics", "series", "events", "characters", "creators"],
    entities_to_unpack: &[],
    post_process: Some(original_issue),
};

fn original_issue(row: &mut JsonObject) -> Result<()> {
    resolve_optional_references(row, &["originalIssue"])
}

/// All definitions in sync order
pub fn all() -> [&'static StreamDefinition; 6] {
    [&CHARACTERS, &COMICS, &CREATORS, &EVENTS, &SERIES, &STORIES]
}
