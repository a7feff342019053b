//! CLI module
//!
//! Command-line interface for running the connector.
//!
//! # Commands
//!
//! - `spec` - Print the configuration specification
//! - `check` - Test connection to the API
//! - `discover` - List available streams
//! - `read` - Extract data from streams

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;

#[cfg(test)]
mod tests;
