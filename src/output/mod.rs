//! Output module
//!
//! Where engine messages go once produced.
//!
//! # Overview
//!
//! This module provides:
//! - `MessageSink` - The seam between the engine and its consumer
//! - `JsonLinesWriter` - One JSON message per line on any `io::Write`
//! - A `Vec<Message>` sink for collecting messages in memory

mod sink;
mod writer;

pub use sink::MessageSink;
pub use writer::JsonLinesWriter;
