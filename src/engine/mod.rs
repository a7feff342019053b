//! Execution engine module
//!
//! Main read loop: pulls pages from a `ResourceStream`, hands every record to
//! a sink as soon as its page arrives, and moves the stream's cursor along.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - Drives one stream at a time against shared state
//! - `SyncConfig` - Configuration for sync operations
//! - Message types for output (Schema, Record, State, Log)

mod types;

pub use types::{Message, StreamOutcome, SyncConfig, SyncStats};

use crate::error::Result;
use crate::output::MessageSink;
use crate::state::StateManager;
use crate::stream::ResourceStream;
use futures::TryStreamExt;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Sync engine for orchestrating data extraction
#[derive(Debug)]
pub struct SyncEngine {
    /// State manager
    state: StateManager,
    /// Sync configuration
    config: SyncConfig,
    /// Statistics
    stats: SyncStats,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(state: StateManager) -> Self {
        Self {
            state,
            config: SyncConfig::default(),
            stats: SyncStats::default(),
        }
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Get the sync configuration
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Sync a single stream
    ///
    /// Emits SCHEMA first, then each page's records as the page arrives,
    /// with a STATE message after every page. A failure still emits the
    /// state reached so far, and the outcome keeps the count of records
    /// already emitted.
    pub async fn sync_stream<S>(&mut self, stream: &ResourceStream, sink: &mut S) -> StreamOutcome
    where
        S: MessageSink + ?Sized,
    {
        let start = Instant::now();
        let name = stream.name();

        let mut emitted = 0usize;
        let result = self.run(stream, sink, &mut emitted).await;

        #[allow(clippy::cast_possible_truncation)]
        let elapsed_ms = start.elapsed().as_millis() as u64;
        self.stats.add_duration(elapsed_ms);

        match result {
            Ok(()) => {
                self.stats.add_stream();
                info!(stream = name, records = emitted, "Completed sync");
                StreamOutcome::completed(emitted)
            }
            Err(e) => {
                self.stats.add_error();
                warn!(
                    stream = name,
                    error = %e,
                    records = emitted,
                    retryable = e.is_retryable(),
                    "Stream failed"
                );
                self.flush_state(name, sink).await;
                StreamOutcome::failed(emitted, e)
            }
        }
    }

    async fn run<S>(
        &mut self,
        stream: &ResourceStream,
        sink: &mut S,
        emitted: &mut usize,
    ) -> Result<()>
    where
        S: MessageSink + ?Sized,
    {
        let name = stream.name();
        let replication_key = stream.definition().replication_key;

        sink.emit(&Message::schema(stream.definition()))?;
        sink.emit(&Message::info(format!("Starting sync for stream: {name}")))?;

        let stored = self.state.get_cursor(name).await;
        let cursor = stream.starting_cursor(stored.as_deref());
        info!(stream = name, cursor = ?cursor, "Starting sync");

        self.drain(stream, cursor, replication_key, sink, emitted).await?;

        sink.emit(&Message::info(format!(
            "Completed sync for {name}: {emitted} records"
        )))?;
        Ok(())
    }

    /// Emit and persist the state reached by a failed stream
    ///
    /// Failures here are logged only; the stream's own error is what the
    /// caller gets.
    async fn flush_state<S>(&self, name: &str, sink: &mut S)
    where
        S: MessageSink + ?Sized,
    {
        if let Err(e) = sink.emit(&Message::state(self.state.snapshot().await)) {
            warn!(stream = name, error = %e, "Failed to emit state after stream error");
        }
        if let Err(e) = self.state.checkpoint().await {
            warn!(stream = name, error = %e, "Failed to checkpoint state after stream error");
        }
    }

    async fn drain<S>(
        &mut self,
        stream: &ResourceStream,
        cursor: Option<String>,
        replication_key: &str,
        sink: &mut S,
        emitted: &mut usize,
    ) -> Result<()>
    where
        S: MessageSink + ?Sized,
    {
        let name = stream.name();
        let mut pages = std::pin::pin!(stream.pages(cursor));

        while let Some(page) = pages.try_next().await? {
            self.stats.add_page();
            debug!(stream = name, records = page.len(), "Emitting page");

            let mut capped = false;
            for record in page {
                if self.config.limit_reached(*emitted) {
                    capped = true;
                    break;
                }
                if let Some(value) = record.get_str(replication_key) {
                    self.state.advance_cursor(name, value).await;
                }
                sink.emit(&Message::record(record))?;
                *emitted += 1;
                self.stats.add_records(1);
            }

            sink.emit(&Message::state(self.state.snapshot().await))?;
            self.state.checkpoint().await?;

            if capped || self.config.limit_reached(*emitted) {
                info!(
                    stream = name,
                    max_records = self.config.max_records,
                    "Record limit reached"
                );
                break;
            }
        }

        Ok(())
    }
}
