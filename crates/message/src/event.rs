//! Leaf messages
//!
//! An event records something that happened inside a transaction. Events
//! created through `Transaction::new_event` have no sink: they travel with
//! their parent. A standalone event built with a sink flushes itself.

use crate::flush::FlushSink;
use crate::message::{Message, Messager};
use crate::record::MessageRecord;
use calltree_core::{MessageKind, STATUS_SUCCESS};
use std::sync::{Arc, Weak};
use tracing::trace;

/// A leaf message without children
#[derive(Debug)]
pub struct Event {
    message: Message,
    this: Weak<Event>,
}

impl Event {
    /// Create an open event with the success status
    pub fn new(
        message_type: impl Into<String>,
        name: impl Into<String>,
        flush: Option<Arc<dyn FlushSink>>,
    ) -> Arc<Self> {
        Self::with_status(message_type, name, STATUS_SUCCESS, flush)
    }

    /// Create an open event with a custom initial status
    pub fn with_status(
        message_type: impl Into<String>,
        name: impl Into<String>,
        default_status: &str,
        flush: Option<Arc<dyn FlushSink>>,
    ) -> Arc<Self> {
        let message = Message::new(message_type, name, default_status, flush);
        Arc::new_cyclic(|this| Event {
            message,
            this: this.clone(),
        })
    }
}

impl Messager for Event {
    fn message(&self) -> &Message {
        &self.message
    }

    fn kind(&self) -> MessageKind {
        MessageKind::Event
    }

    fn complete(&self) {
        if !self.message.mark_completed() {
            return;
        }
        trace!(
            target: "calltree::event",
            message_type = %self.message.message_type(),
            name = %self.message.name(),
            "Event completed"
        );
        if let Some(this) = self.this.upgrade() {
            self.message.hand_off(this);
        }
    }

    fn snapshot(&self) -> MessageRecord {
        self.message.record(MessageKind::Event)
    }
}
