//! State management module
//!
//! Tracks the replication cursor of every stream so the next run only asks
//! for records modified since the last one.
//!
//! # Overview
//!
//! The state module provides:
//! - `State` - Per-stream cursor map, serialized as JSON
//! - `StateManager` - Shared, file-backed access with monotonic cursor updates

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{cursor_is_newer, State, StreamState};

#[cfg(test)]
mod manager_tests;
