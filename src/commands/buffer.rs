//! Transaction / pipeline result buffer.
//!
//! While a handle is buffering, each command's reply is appended here and
//! the caller gets [`Reply::Queued`] back instead. `EXEC`/`EXECUTE` hand the
//! collected replies back in call order; `DISCARD` drops them.
//!
//! Commands still run immediately against the keyspace. Only their replies
//! are deferred.

use crate::protocol::Reply;
use tracing::{debug, warn};

/// Where command replies go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferMode {
    /// Replies are returned to the caller
    #[default]
    Direct,
    /// Inside `MULTI` ... `EXEC`
    Transaction,
    /// Inside `PIPELINE` ... `EXECUTE`
    Pipeline,
}

/// Per-handle accumulator of deferred replies.
#[derive(Debug, Default)]
pub struct ResultBuffer {
    mode: BufferMode,
    results: Vec<Reply>,
}

impl ResultBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> BufferMode {
        self.mode
    }

    pub fn is_buffering(&self) -> bool {
        self.mode != BufferMode::Direct
    }

    /// Number of replies collected so far.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Starts buffering with an empty result list.
    ///
    /// Calling this while already buffering throws away what was collected.
    pub fn begin(&mut self, mode: BufferMode) {
        if self.is_buffering() {
            warn!(
                previous = ?self.mode,
                dropped = self.results.len(),
                "Buffer restarted while active"
            );
        }
        self.mode = mode;
        self.results.clear();
        debug!(?mode, "Buffering started");
    }

    /// Routes a reply: returned as-is in direct mode, stored otherwise.
    pub fn record(&mut self, reply: Reply) -> Reply {
        if self.is_buffering() {
            self.results.push(reply);
            Reply::Queued
        } else {
            reply
        }
    }

    /// Stops buffering and returns the collected replies.
    pub fn finish(&mut self) -> Vec<Reply> {
        debug!(mode = ?self.mode, replies = self.results.len(), "Buffering finished");
        self.mode = BufferMode::Direct;
        std::mem::take(&mut self.results)
    }

    /// Stops buffering and drops the collected replies. Returns how many
    /// were dropped.
    pub fn discard(&mut self) -> usize {
        let dropped = self.results.len();
        debug!(mode = ?self.mode, dropped, "Buffering discarded");
        self.mode = BufferMode::Direct;
        self.results.clear();
        dropped
    }
}
