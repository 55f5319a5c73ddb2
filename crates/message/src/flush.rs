//! Flush sinks
//!
//! A sink receives each completed root node exactly once, synchronously,
//! from inside `complete`. Whatever happens next (serialization, batching,
//! shipping) belongs to the sink; the core never observes its outcome.
//!
//! Any `Fn(Arc<dyn Messager>) + Send + Sync` closure is a sink. Two sinks
//! are provided for in-process use:
//! - `MemorySink`: keeps flushed nodes for later inspection
//! - `LogSink`: writes one `tracing` record per flushed node

use crate::message::Messager;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

/// Receiver of completed messages
pub trait FlushSink: Send + Sync {
    /// Take ownership of a completed message
    fn flush(&self, message: Arc<dyn Messager>);
}

impl<F> FlushSink for F
where
    F: Fn(Arc<dyn Messager>) + Send + Sync,
{
    fn flush(&self, message: Arc<dyn Messager>) {
        self(message)
    }
}

/// Collects flushed messages in memory, in flush order
#[derive(Debug, Default)]
pub struct MemorySink {
    flushed: Mutex<Vec<Arc<dyn Messager>>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Copy of everything flushed so far
    pub fn flushed(&self) -> Vec<Arc<dyn Messager>> {
        self.flushed.lock().clone()
    }

    /// Remove and return everything flushed so far
    pub fn drain(&self) -> Vec<Arc<dyn Messager>> {
        std::mem::take(&mut *self.flushed.lock())
    }

    /// Number of flushed messages
    pub fn len(&self) -> usize {
        self.flushed.lock().len()
    }

    /// True if nothing has been flushed
    pub fn is_empty(&self) -> bool {
        self.flushed.lock().is_empty()
    }
}

impl FlushSink for MemorySink {
    fn flush(&self, message: Arc<dyn Messager>) {
        self.flushed.lock().push(message);
    }
}

/// Logs every flushed message through `tracing`
///
/// Messages whose status differs from `success_status` are logged at WARN.
#[derive(Debug, Clone)]
pub struct LogSink {
    success_status: String,
}

impl LogSink {
    /// Treat `"0"` as success
    pub fn new() -> Self {
        Self::with_success_status(calltree_core::STATUS_SUCCESS)
    }

    /// Treat `success_status` as success
    pub fn with_success_status(success_status: impl Into<String>) -> Self {
        Self {
            success_status: success_status.into(),
        }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl FlushSink for LogSink {
    fn flush(&self, message: Arc<dyn Messager>) {
        let status = message.status();
        let duration_us = message.duration().map(|d| d.as_micros() as u64);
        let children = message.as_transaction().map_or(0, |t| t.child_count());
        if status == self.success_status {
            info!(
                target: "calltree::flush",
                kind = %message.kind(),
                message_type = %message.message_type(),
                name = %message.name(),
                status = %status,
                duration_us,
                children,
                "Message flushed"
            );
        } else {
            warn!(
                target: "calltree::flush",
                kind = %message.kind(),
                message_type = %message.message_type(),
                name = %message.name(),
                status = %status,
                duration_us,
                children,
                "Message flushed with failure status"
            );
        }
    }
}
