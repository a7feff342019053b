//! Message sink trait

use crate::engine::Message;
use crate::error::Result;

/// Receives messages in the order they are produced
pub trait MessageSink: Send {
    /// Handle one message
    fn emit(&mut self, message: &Message) -> Result<()>;

    /// Flush anything buffered
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Collects messages in memory
impl MessageSink for Vec<Message> {
    fn emit(&mut self, message: &Message) -> Result<()> {
        self.push(message.clone());
        Ok(())
    }
}

impl<S: MessageSink + ?Sized> MessageSink for &mut S {
    fn emit(&mut self, message: &Message) -> Result<()> {
        (**self).emit(message)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
