// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Marvel Connector
//!
//! Incremental extraction of the Marvel comics catalog API.
//!
//! ## Features
//!
//! - **Six Resource Streams**: characters, comics, creators, events, series, stories
//! - **Signed Requests**: `ts`/`apikey`/`hash` computed fresh for every attempt
//! - **Offset Pagination**: 100 records per page until a short page comes back
//! - **Flat Records**: nested entity references reduced to integer ids
//! - **Incremental Sync**: `modified` cursor per stream, never regresses
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use marvel_connector::connector::{Connector, MarvelConnector};
//! use marvel_connector::engine::{Message, SyncEngine};
//! use marvel_connector::state::StateManager;
//! use marvel_connector::{MarvelConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = MarvelConfig::new("public", "private");
//!     let connector = MarvelConnector::new();
//!
//!     let status = connector.check(&config).await?;
//!     let selection = MarvelConnector::select_streams(Some("comics"))?;
//!
//!     let mut engine = SyncEngine::new(StateManager::in_memory());
//!     let mut messages: Vec<Message> = Vec::new();
//!     connector.read(&config, &selection, &mut engine, &mut messages).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Connector Interface                         │
//! │  spec() → ConnectorSpec  check() → Status  discover() → Catalog │
//! │  read(config, streams, engine, sink) → ReadSummary              │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │   HTTP    │   Paginate    │  Stream   │   Output    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ MD5 sign │ GET       │ Offset/limit  │ Catalog   │ JSON lines  │
//! │          │ Retry     │ Dev mode      │ Normalize │ State       │
//! │          │ Rate Limit│               │ Cursor    │             │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the connector
pub mod error;

/// Common types and type aliases
pub mod types;

/// Request signing
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Pagination strategies
pub mod pagination;

/// Response decoders
pub mod decode;

/// Declarative schemas
pub mod schema;

/// Resource streams and record normalization
pub mod stream;

/// State management and checkpointing
pub mod state;

/// Main execution engine
pub mod engine;

/// Message sinks
pub mod output;

/// Connector configuration
pub mod config;

/// Connector trait and the Marvel connector
pub mod connector;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::MarvelConfig;
pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
