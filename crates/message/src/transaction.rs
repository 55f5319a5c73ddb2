//! Composite messages
//!
//! A `Transaction` is a message that owns an ordered list of children and a
//! duration. It moves through two states only:
//!
//! ```text
//! Open ──complete()──> Completed (terminal)
//! ```
//!
//! ## Completion
//!
//! `complete` is idempotent. The first call freezes the child list, fills in
//! the duration if the caller never set one, and hands the transaction to
//! its sink. Later calls return immediately.
//!
//! ## Locking
//!
//! - `children` (RwLock): appends take the write lock, `children()` copies
//!   under the read lock. `complete` holds the write lock while flipping the
//!   completed flag, so no append can land after completion.
//! - `timing` (Mutex): explicit duration and duration start.
//!
//! Children form a tree: `add_child` refuses a node that already contains
//! the receiving transaction.
//!
//! Lock order is `children` → envelope state and `timing` → envelope state.
//! No lock is held while the sink runs, so a sink may read the tree freely.
//! Transactions never lock each other.

use crate::event::Event;
use crate::flush::FlushSink;
use crate::message::{Message, Messager};
use crate::record::MessageRecord;
use calltree_core::{DurationOrigin, Error, MessageKind, Result, Timestamp, TransactionConfig};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

#[derive(Debug, Default)]
struct Timing {
    /// Zero means "not set"
    duration: Duration,
    duration_start: Option<Timestamp>,
}

/// A composite message with children and a duration
pub struct Transaction {
    message: Message,
    children: RwLock<Vec<Arc<dyn Messager>>>,
    timing: Mutex<Timing>,
    /// Monotonic twin of `message.timestamp()`
    started: Instant,
    config: TransactionConfig,
    this: Weak<Transaction>,
}

impl Transaction {
    /// Open a transaction with the default configuration
    ///
    /// `flush` receives the transaction once, when it completes. Pass `None`
    /// to complete without handing off.
    pub fn new(
        message_type: impl Into<String>,
        name: impl Into<String>,
        flush: Option<Arc<dyn FlushSink>>,
    ) -> Arc<Self> {
        Self::with_config(message_type, name, flush, TransactionConfig::default())
    }

    /// Open a transaction with an explicit configuration
    pub fn with_config(
        message_type: impl Into<String>,
        name: impl Into<String>,
        flush: Option<Arc<dyn FlushSink>>,
        config: TransactionConfig,
    ) -> Arc<Self> {
        let message = Message::new(message_type, name, &config.default_status, flush);
        trace!(
            target: "calltree::txn",
            message_type = %message.message_type(),
            name = %message.name(),
            "Transaction opened"
        );
        Arc::new_cyclic(|this| Transaction {
            message,
            children: RwLock::new(Vec::new()),
            timing: Mutex::new(Timing::default()),
            started: Instant::now(),
            config,
            this: this.clone(),
        })
    }

    /// Configuration this transaction was opened with
    pub fn config(&self) -> &TransactionConfig {
        &self.config
    }

    // ========================================================================
    // Children
    // ========================================================================

    /// Append a child
    ///
    /// Safe to call from many threads at once; every append lands exactly
    /// once. The child's own completion stays with the caller.
    ///
    /// # Errors
    /// - `CyclicChild` if `child` is this transaction or has it as a
    ///   descendant.
    /// - `AlreadyCompleted` if this transaction has completed.
    pub fn add_child(&self, child: Arc<dyn Messager>) -> Result<()> {
        // Runs before taking our own lock: the walk read-locks descendants.
        if self.is_reachable_from(&child) {
            debug!(
                target: "calltree::txn",
                message_type = %self.message.message_type(),
                name = %self.message.name(),
                "Rejected child that would close a cycle"
            );
            return Err(Error::cyclic_child(
                self.message.message_type(),
                self.message.name(),
            ));
        }
        let mut children = self.children.write();
        self.message.ensure_open("children")?;
        children.push(child);
        Ok(())
    }

    /// True if this transaction is `node` or lies somewhere below it
    fn is_reachable_from(&self, node: &Arc<dyn Messager>) -> bool {
        let mut pending = vec![Arc::clone(node)];
        while let Some(next) = pending.pop() {
            if let Some(txn) = next.as_transaction() {
                if std::ptr::eq(txn, self) {
                    return true;
                }
                pending.extend(txn.children());
            }
        }
        false
    }

    /// Copy of the child list in append order
    pub fn children(&self) -> Vec<Arc<dyn Messager>> {
        self.children.read().clone()
    }

    /// Number of direct children
    pub fn child_count(&self) -> usize {
        self.children.read().len()
    }

    /// Create an open event and append it
    ///
    /// The event is already in the child list when this returns. The caller
    /// completes it, or uses [`Transaction::log_event`] instead.
    pub fn new_event(
        &self,
        message_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Arc<Event>> {
        let event = Event::with_status(message_type, name, &self.config.default_status, None);
        self.add_child(event.clone())?;
        Ok(event)
    }

    /// Record an already finished event
    ///
    /// `args[0]` becomes the status and `args[1]` the data; further entries
    /// are ignored.
    pub fn log_event(
        &self,
        message_type: impl Into<String>,
        name: impl Into<String>,
        args: &[&str],
    ) -> Result<()> {
        let event = self.new_event(message_type, name)?;
        if let Some(status) = args.first() {
            event.set_status(status)?;
        }
        if let Some(data) = args.get(1) {
            event.set_data(data)?;
        }
        event.complete();
        Ok(())
    }

    /// Open a nested transaction and append it
    ///
    /// The child has no sink of its own; it is shipped inside this one. It
    /// inherits this transaction's configuration.
    pub fn new_transaction(
        &self,
        message_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Arc<Transaction>> {
        let child = Transaction::with_config(message_type, name, None, self.config.clone());
        self.add_child(child.clone())?;
        Ok(child)
    }

    // ========================================================================
    // Duration
    // ========================================================================

    /// Duration so far: the explicit value, the computed value after
    /// completion, or zero
    pub fn duration(&self) -> Duration {
        self.timing.lock().duration
    }

    /// Set the duration explicitly. A zero duration means "compute it".
    pub fn set_duration(&self, duration: Duration) -> Result<()> {
        let mut timing = self.timing.lock();
        self.message.ensure_open("duration")?;
        timing.duration = duration;
        Ok(())
    }

    /// Record an alternate start instant
    ///
    /// Only consulted with [`DurationOrigin::DurationStart`].
    pub fn set_duration_start(&self, start: Timestamp) -> Result<()> {
        let mut timing = self.timing.lock();
        self.message.ensure_open("duration_start")?;
        timing.duration_start = Some(start);
        Ok(())
    }

    /// Alternate start instant, if one was recorded
    pub fn duration_start(&self) -> Option<Timestamp> {
        self.timing.lock().duration_start
    }

    /// Never zero: a start that is not strictly in the past falls back to
    /// the time since construction.
    fn implicit_duration(&self, timing: &Timing) -> Duration {
        let from_start = match (self.config.duration_origin, timing.duration_start) {
            (DurationOrigin::DurationStart, Some(start)) => Timestamp::now().duration_since(start),
            _ => None,
        };
        match from_start {
            Some(elapsed) if !elapsed.is_zero() => elapsed,
            _ => self.started.elapsed().max(Duration::from_nanos(1)),
        }
    }

    // ========================================================================
    // Correlation ids
    // ========================================================================

    /// Assign this transaction's id
    pub fn set_message_id(&self, message_id: impl Into<String>) {
        self.message.set_message_id(message_id);
    }

    /// Assign the id of the trace root
    pub fn set_root_message_id(&self, root_message_id: impl Into<String>) {
        self.message.set_root_message_id(root_message_id);
    }

    /// Assign the id of the direct parent
    pub fn set_parent_message_id(&self, parent_message_id: impl Into<String>) {
        self.message.set_parent_message_id(parent_message_id);
    }
}

impl Messager for Transaction {
    fn message(&self) -> &Message {
        &self.message
    }

    fn kind(&self) -> MessageKind {
        MessageKind::Transaction
    }

    fn complete(&self) {
        let (duration, child_count) = {
            let children = self.children.write();
            if !self.message.mark_completed() {
                return;
            }
            let mut timing = self.timing.lock();
            if timing.duration.is_zero() {
                timing.duration = self.implicit_duration(&timing);
            }
            (timing.duration, children.len())
        };

        debug!(
            target: "calltree::txn",
            message_type = %self.message.message_type(),
            name = %self.message.name(),
            status = %self.message.status(),
            duration_us = duration.as_micros() as u64,
            children = child_count,
            "Transaction completed"
        );

        if let Some(this) = self.this.upgrade() {
            self.message.hand_off(this);
        }
    }

    fn snapshot(&self) -> MessageRecord {
        let mut record = self.message.record(MessageKind::Transaction);
        record.duration_us = Some(self.duration().as_micros() as u64);
        record.children = self.children().iter().map(|c| c.snapshot()).collect();
        record
    }

    fn as_transaction(&self) -> Option<&Transaction> {
        Some(self)
    }

    fn duration(&self) -> Option<Duration> {
        Some(Transaction::duration(self))
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("message", &self.message)
            .field("children", &self.child_count())
            .field("timing", &*self.timing.lock())
            .field("config", &self.config)
            .finish()
    }
}
