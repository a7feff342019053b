//! Connector trait and the Marvel connector
//!
//! Defines the `Connector` trait (`spec`, `check`, `discover`, `read`) and
//! `MarvelConnector`, which serves the six resource streams.

use crate::auth::Authenticator;
use crate::config::{MarvelConfig, SpecConfig};
use crate::engine::{Message, SyncEngine, SyncStats};
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::output::MessageSink;
use crate::stream::{catalog, Resource, ResourceStream, StreamDefinition};
use crate::types::{JsonValue, SyncMode};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Path probed by `check`
const CHECK_PATH: &str = "/characters";

// ============================================================================
// Connector Spec (for UI)
// ============================================================================

/// Connector specification returned by spec()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorSpec {
    /// Connector name
    pub name: String,

    /// Human-readable title
    pub title: String,

    /// Description
    pub description: Option<String>,

    /// Documentation link
    pub documentation_url: Option<String>,

    /// Configuration specification
    pub spec: SpecConfig,
}

impl ConnectorSpec {
    /// Wire representation
    pub fn to_json(&self) -> JsonValue {
        let mut connection = self.spec.to_json_schema();
        connection["title"] = json!(self.title);
        json!({
            "type": "SPEC",
            "spec": {
                "name": self.name,
                "description": self.description,
                "documentationUrl": self.documentation_url,
                "connectionSpecification": connection
            }
        })
    }
}

// ============================================================================
// Check Result
// ============================================================================

/// Result of a connection check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the check succeeded
    pub success: bool,

    /// Error message if failed
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Create a failed check result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }

    /// Wire representation
    pub fn to_json(&self) -> JsonValue {
        json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": {
                "status": if self.success { "SUCCEEDED" } else { "FAILED" },
                "message": self.message.as_deref().unwrap_or("Connection successful")
            }
        })
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Streams offered by the connector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// One entry per stream
    pub streams: Vec<CatalogStream>,
}

impl Catalog {
    /// Find a stream entry by name
    pub fn get_stream(&self, name: &str) -> Option<&CatalogStream> {
        self.streams.iter().find(|s| s.name == name)
    }

    /// Wire representation
    pub fn to_json(&self) -> JsonValue {
        json!({"type": "CATALOG", "catalog": self})
    }
}

/// Description of one stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogStream {
    /// Stream name
    pub name: String,

    /// JSON Schema of the records
    pub json_schema: JsonValue,

    /// Supported sync modes
    pub supported_sync_modes: Vec<SyncMode>,

    /// Default cursor field path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_cursor_field: Option<Vec<String>>,

    /// Primary key field paths
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_defined_primary_key: Option<Vec<Vec<String>>>,
}

impl From<&StreamDefinition> for CatalogStream {
    fn from(definition: &StreamDefinition) -> Self {
        Self {
            name: definition.name.to_string(),
            json_schema: definition.json_schema().to_json(),
            supported_sync_modes: vec![SyncMode::FullRefresh, SyncMode::Incremental],
            default_cursor_field: Some(vec![definition.replication_key.to_string()]),
            source_defined_primary_key: Some(
                definition
                    .primary_key
                    .iter()
                    .map(|k| vec![(*k).to_string()])
                    .collect(),
            ),
        }
    }
}

// ============================================================================
// Read Summary
// ============================================================================

/// Outcome of one stream within a read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamResult {
    /// Stream name
    pub stream: String,
    /// `SUCCESS` or `FAILED`
    pub status: &'static str,
    /// Records emitted
    pub records_synced: usize,
    /// Wall time
    pub duration_ms: u64,
    /// Failure message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StreamResult {
    /// Whether the stream finished
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of a whole read
#[derive(Debug, Clone, Default)]
pub struct ReadSummary {
    /// Per-stream outcomes in sync order
    pub streams: Vec<StreamResult>,
    /// Engine totals
    pub stats: SyncStats,
    /// Wall time
    pub duration_ms: u64,
}

impl ReadSummary {
    /// Number of failed streams
    pub fn failed_streams(&self) -> usize {
        self.streams.iter().filter(|s| !s.succeeded()).count()
    }

    /// Overall status
    pub fn status(&self) -> &'static str {
        let failed = self.failed_streams();
        if failed == 0 {
            "SUCCEEDED"
        } else if failed == self.streams.len() {
            "FAILED"
        } else {
            "PARTIAL"
        }
    }

    /// Wire representation
    pub fn to_json(&self) -> JsonValue {
        json!({
            "type": "SYNC_SUMMARY",
            "summary": {
                "status": self.status(),
                "total_records": self.stats.records_synced,
                "total_pages": self.stats.pages_fetched,
                "total_streams": self.streams.len(),
                "failed_streams": self.failed_streams(),
                "duration_ms": self.duration_ms,
                "streams": self.streams
            }
        })
    }
}

// ============================================================================
// Connector Trait
// ============================================================================

/// Core trait that connectors implement
#[async_trait]
pub trait Connector: Send + Sync {
    /// Returns the connector specification (for UI/validation)
    fn spec(&self) -> ConnectorSpec;

    /// Tests if credentials and configuration are valid
    async fn check(&self, config: &MarvelConfig) -> Result<CheckResult>;

    /// Lists the available streams
    fn discover(&self) -> Catalog;

    /// Reads the selected streams in order, emitting messages into `sink`
    ///
    /// A failing stream is reported and skipped unless the engine is
    /// configured to fail fast.
    async fn read(
        &self,
        config: &MarvelConfig,
        selection: &[Resource],
        engine: &mut SyncEngine,
        sink: &mut dyn MessageSink,
    ) -> Result<ReadSummary>;
}

// ============================================================================
// Marvel Connector
// ============================================================================

/// Connector for the Marvel comics catalog API
#[derive(Debug, Clone, Copy, Default)]
pub struct MarvelConnector;

impl MarvelConnector {
    /// Create the connector
    pub fn new() -> Self {
        Self
    }

    /// Build the signing transport shared by every stream of a run
    pub fn client(config: &MarvelConfig) -> Result<HttpClient> {
        let auth = Authenticator::new(&config.public_key, &config.private_key)?;
        HttpClient::with_auth(config.http_config(), auth)
    }

    /// Resolve a comma-separated stream list; `None` or empty means all
    pub fn select_streams(names: Option<&str>) -> Result<Vec<Resource>> {
        let Some(names) = names.map(str::trim).filter(|n| !n.is_empty()) else {
            return Ok(Resource::ALL.to_vec());
        };

        let mut selected = Vec::new();
        for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let resource = Resource::from_name(name)?;
            if !selected.contains(&resource) {
                selected.push(resource);
            }
        }
        Ok(selected)
    }
}

#[async_trait]
impl Connector for MarvelConnector {
    fn spec(&self) -> ConnectorSpec {
        ConnectorSpec {
            name: crate::NAME.to_string(),
            title: "Marvel".to_string(),
            description: Some(
                "Characters, comics, creators, events, series and stories from the Marvel API"
                    .to_string(),
            ),
            documentation_url: Some("https://developer.marvel.com/docs".to_string()),
            spec: MarvelConfig::spec(),
        }
    }

    async fn check(&self, config: &MarvelConfig) -> Result<CheckResult> {
        if let Err(e) = config.validate() {
            return Ok(CheckResult::failure(e.to_string()));
        }

        let client = Self::client(config)?;
        let request = RequestConfig::new().query("limit", "1");
        match client.get_json_with_config(CHECK_PATH, request).await {
            Ok(_) => {
                info!("Connection check succeeded");
                Ok(CheckResult::success())
            }
            Err(e) => {
                warn!(error = %e, "Connection check failed");
                Ok(CheckResult::failure(format!("Connection failed: {e}")))
            }
        }
    }

    fn discover(&self) -> Catalog {
        Catalog {
            streams: catalog::all().into_iter().map(CatalogStream::from).collect(),
        }
    }

    async fn read(
        &self,
        config: &MarvelConfig,
        selection: &[Resource],
        engine: &mut SyncEngine,
        sink: &mut dyn MessageSink,
    ) -> Result<ReadSummary> {
        config.validate()?;
        let start = Instant::now();
        let client = Arc::new(Self::client(config)?);
        let mut summary = ReadSummary::default();

        for resource in selection {
            let stream = ResourceStream::new(resource.definition(), Arc::clone(&client), config);
            let stream_start = Instant::now();
            let outcome = engine.sync_stream(&stream, &mut *sink).await;
            #[allow(clippy::cast_possible_truncation)]
            let duration_ms = stream_start.elapsed().as_millis() as u64;

            let records_synced = outcome.records;
            match outcome.into_result() {
                Ok(_) => summary.streams.push(StreamResult {
                    stream: resource.name().to_string(),
                    status: "SUCCESS",
                    records_synced,
                    duration_ms,
                    error: None,
                }),
                Err(e) => {
                    sink.emit(&Message::error(format!(
                        "Error syncing stream {}: {e}",
                        resource.name()
                    )))?;
                    summary.streams.push(StreamResult {
                        stream: resource.name().to_string(),
                        status: "FAILED",
                        records_synced,
                        duration_ms,
                        error: Some(e.to_string()),
                    });
                    if engine.config().fail_fast {
                        return Err(e);
                    }
                }
            }
        }

        sink.flush()?;
        summary.stats = engine.stats().clone();
        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = start.elapsed().as_millis() as u64;
        summary.duration_ms = duration_ms;
        Ok(summary)
    }
}
