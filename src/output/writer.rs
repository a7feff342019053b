//! JSON-lines writer
//!
//! Serializes each message as one line of JSON. Pretty mode spreads a
//! message over several lines for reading by eye.

use super::sink::MessageSink;
use crate::engine::Message;
use crate::error::Result;
use std::io::{self, Stdout, Write};

/// Writes messages as JSON lines
#[derive(Debug)]
pub struct JsonLinesWriter<W: Write> {
    writer: W,
    pretty: bool,
    written: usize,
}

impl JsonLinesWriter<Stdout> {
    /// Writer on standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLinesWriter<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
            written: 0,
        }
    }

    /// Pretty-print messages
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Number of messages written so far
    #[must_use]
    pub fn messages_written(&self) -> usize {
        self.written
    }

    /// Unwrap the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> MessageSink for JsonLinesWriter<W> {
    fn emit(&mut self, message: &Message) -> Result<()> {
        let value = message.to_json();
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &value)?;
        } else {
            serde_json::to_writer(&mut self.writer, &value)?;
        }
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
