//! Engine types
//!
//! Message types and configuration for the sync engine.

use crate::error::{Error, Result};
use crate::state::State;
use crate::stream::{Record, StreamDefinition};
use crate::types::{JsonObject, JsonValue, LogLevel};
use serde_json::json;

/// A message emitted during sync
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Schema of a stream, sent before its records
    Schema {
        /// Stream name
        stream: String,
        /// JSON Schema of the records
        schema: JsonValue,
        /// Primary key fields
        key_properties: Vec<String>,
        /// Replication cursor fields
        bookmark_properties: Vec<String>,
    },
    /// A single normalized record
    Record {
        /// Stream name
        stream: String,
        /// Record fields
        record: JsonObject,
        /// Emission time, epoch milliseconds
        emitted_at: i64,
    },
    /// Full connector state
    State {
        /// Cursors of every stream
        state: State,
    },
    /// Log message
    Log {
        /// Log level
        level: LogLevel,
        /// Log message
        message: String,
    },
}

impl Message {
    /// Create the schema message for a stream
    pub fn schema(definition: &StreamDefinition) -> Self {
        Self::Schema {
            stream: definition.name.to_string(),
            schema: definition.json_schema().to_json(),
            key_properties: definition
                .primary_key
                .iter()
                .map(ToString::to_string)
                .collect(),
            bookmark_properties: vec![definition.replication_key.to_string()],
        }
    }

    /// Create a record message stamped with the current time
    pub fn record(record: Record) -> Self {
        Self::Record {
            stream: record.stream.to_string(),
            record: record.data,
            emitted_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Create a state message
    pub fn state(state: State) -> Self {
        Self::State { state }
    }

    /// Create a log message
    pub fn log(level: LogLevel, message: impl Into<String>) -> Self {
        Self::Log {
            level,
            message: message.into(),
        }
    }

    /// Create an info log
    pub fn info(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Info, message)
    }

    /// Create a warning log
    pub fn warn(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Warn, message)
    }

    /// Create an error log
    pub fn error(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Error, message)
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Check if this is a state message
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State { .. })
    }

    /// Check if this is a schema message
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    /// Check if this is a log message
    pub fn is_log(&self) -> bool {
        matches!(self, Self::Log { .. })
    }

    /// Wire representation
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Schema {
                stream,
                schema,
                key_properties,
                bookmark_properties,
            } => json!({
                "type": "SCHEMA",
                "stream": stream,
                "schema": schema,
                "key_properties": key_properties,
                "bookmark_properties": bookmark_properties
            }),
            Self::Record {
                stream,
                record,
                emitted_at,
            } => json!({
                "type": "RECORD",
                "record": {
                    "stream": stream,
                    "data": record,
                    "emitted_at": emitted_at
                }
            }),
            Self::State { state } => json!({
                "type": "STATE",
                "state": state
            }),
            Self::Log { level, message } => json!({
                "type": "LOG",
                "log": {
                    "level": level,
                    "message": message
                }
            }),
        }
    }
}

/// Configuration for sync operation
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Maximum records per stream (0 = unlimited)
    pub max_records: usize,
    /// Stop the whole read at the first failing stream
    pub fail_fast: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_records: 0,
            fail_fast: false,
        }
    }
}

impl SyncConfig {
    /// Create a new sync config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max records
    #[must_use]
    pub fn with_max_records(mut self, max: usize) -> Self {
        self.max_records = max;
        self
    }

    /// Set fail fast mode
    #[must_use]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Whether `count` records reach the per-stream cap
    pub fn limit_reached(&self, count: usize) -> bool {
        self.max_records > 0 && count >= self.max_records
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Total records synced
    pub records_synced: usize,
    /// Total pages fetched
    pub pages_fetched: usize,
    /// Total streams synced
    pub streams_synced: usize,
    /// Errors encountered
    pub errors: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records
    pub fn add_records(&mut self, count: usize) {
        self.records_synced += count;
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Add a stream
    pub fn add_stream(&mut self) {
        self.streams_synced += 1;
    }

    /// Add an error
    pub fn add_error(&mut self) {
        self.errors += 1;
    }

    /// Add elapsed time
    pub fn add_duration(&mut self, ms: u64) {
        self.duration_ms += ms;
    }
}

/// How one stream sync ended
///
/// `records` counts everything emitted, including records sent before a
/// failure ended the stream.
#[derive(Debug)]
pub struct StreamOutcome {
    /// Records emitted
    pub records: usize,
    /// Error that ended the stream early
    pub error: Option<Error>,
}

impl StreamOutcome {
    /// A stream that ran to completion
    pub fn completed(records: usize) -> Self {
        Self {
            records,
            error: None,
        }
    }

    /// A stream that failed after emitting `records`
    pub fn failed(records: usize, error: Error) -> Self {
        Self {
            records,
            error: Some(error),
        }
    }

    /// Whether the stream ran to completion
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Record count, or the error that ended the stream
    pub fn into_result(self) -> Result<usize> {
        match self.error {
            None => Ok(self.records),
            Some(e) => Err(e),
        }
    }
}
