//! Tracer: factory for root messages
//!
//! A `Tracer` holds the sink and configuration that every root transaction
//! and standalone event it creates should share, so call sites do not pass
//! them around. It also counts what it opened and what reached the sink.
//!
//! # Memory Ordering
//!
//! Counters use Relaxed ordering. They are observational only and do not
//! synchronize any other memory; approximate reads under load are fine.

use crate::event::Event;
use crate::flush::FlushSink;
use crate::message::Messager;
use crate::transaction::Transaction;
use calltree_core::{Result, TransactionConfig};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Point-in-time view of a tracer's counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TracerMetrics {
    /// Root transactions opened
    pub transactions_opened: u64,
    /// Standalone events created
    pub events_created: u64,
    /// Root messages handed to the sink
    pub flushed: u64,
}

impl TracerMetrics {
    /// Root messages created but not yet flushed
    pub fn in_flight(&self) -> u64 {
        (self.transactions_opened + self.events_created).saturating_sub(self.flushed)
    }
}

#[derive(Debug, Default)]
struct Counters {
    transactions_opened: AtomicU64,
    events_created: AtomicU64,
    flushed: AtomicU64,
}

/// Counts flushes, then forwards to the user's sink (if any)
struct CountingSink {
    inner: Option<Arc<dyn FlushSink>>,
    counters: Arc<Counters>,
}

impl FlushSink for CountingSink {
    fn flush(&self, message: Arc<dyn Messager>) {
        self.counters.flushed.fetch_add(1, Ordering::Relaxed);
        if let Some(inner) = &self.inner {
            inner.flush(message);
        }
    }
}

/// Creates root transactions and standalone events bound to one sink
///
/// Cloning is cheap and clones share counters and sink.
#[derive(Clone)]
pub struct Tracer {
    sink: Arc<dyn FlushSink>,
    config: TransactionConfig,
    counters: Arc<Counters>,
}

impl Tracer {
    /// Tracer that hands completed roots to `sink`
    pub fn new(sink: Arc<dyn FlushSink>) -> Self {
        Self::build(Some(sink))
    }

    /// Tracer whose roots are completed but not handed anywhere
    pub fn without_sink() -> Self {
        Self::build(None)
    }

    fn build(inner: Option<Arc<dyn FlushSink>>) -> Self {
        let counters = Arc::new(Counters::default());
        let sink = Arc::new(CountingSink {
            inner,
            counters: Arc::clone(&counters),
        });
        Self {
            sink,
            config: TransactionConfig::default(),
            counters,
        }
    }

    /// Use `config` for every transaction created from now on
    pub fn with_config(mut self, config: TransactionConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration
    pub fn config(&self) -> &TransactionConfig {
        &self.config
    }

    /// Open a root transaction
    pub fn new_transaction(
        &self,
        message_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Arc<Transaction> {
        self.counters
            .transactions_opened
            .fetch_add(1, Ordering::Relaxed);
        Transaction::with_config(
            message_type,
            name,
            Some(Arc::clone(&self.sink)),
            self.config.clone(),
        )
    }

    /// Create an open standalone event that flushes itself on completion
    pub fn new_event(&self, message_type: impl Into<String>, name: impl Into<String>) -> Arc<Event> {
        self.counters.events_created.fetch_add(1, Ordering::Relaxed);
        Event::with_status(
            message_type,
            name,
            &self.config.default_status,
            Some(Arc::clone(&self.sink)),
        )
    }

    /// Record and flush a finished standalone event
    ///
    /// Same argument rules as [`Transaction::log_event`].
    pub fn log_event(
        &self,
        message_type: impl Into<String>,
        name: impl Into<String>,
        args: &[&str],
    ) -> Result<()> {
        let event = self.new_event(message_type, name);
        if let Some(status) = args.first() {
            event.set_status(status)?;
        }
        if let Some(data) = args.get(1) {
            event.set_data(data)?;
        }
        event.complete();
        Ok(())
    }

    /// Snapshot of the counters
    pub fn metrics(&self) -> TracerMetrics {
        TracerMetrics {
            transactions_opened: self.counters.transactions_opened.load(Ordering::Relaxed),
            events_created: self.counters.events_created.load(Ordering::Relaxed),
            flushed: self.counters.flushed.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracer")
            .field("config", &self.config)
            .field("metrics", &self.metrics())
            .finish()
    }
}
