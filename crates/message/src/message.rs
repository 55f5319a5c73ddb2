//! Message envelope and the `Messager` capability set
//!
//! `Message` holds what every node of a call tree carries: classification,
//! creation timestamp, outcome fields, correlation ids and the optional
//! flush sink. `Event` and `Transaction` compose it and implement
//! `Messager`, which is what child lists and sinks deal in.
//!
//! ## Completion rule
//!
//! Once a message is completed its status and data are frozen. Setters
//! return `Error::AlreadyCompleted` instead of silently writing. Correlation
//! ids stay assignable because correlation layers usually assign them from
//! inside the sink, after completion.

use crate::flush::FlushSink;
use crate::record::MessageRecord;
use crate::transaction::Transaction;
use calltree_core::{Error, MessageIds, MessageKind, Result, Timestamp};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Mutable part of a message
#[derive(Debug, Clone)]
struct MessageState {
    status: String,
    data: String,
    ids: MessageIds,
    completed: bool,
}

/// The envelope shared by events and transactions
pub struct Message {
    message_type: String,
    name: String,
    timestamp: Timestamp,
    state: Mutex<MessageState>,
    flush: Option<Arc<dyn FlushSink>>,
}

impl Message {
    /// Create an open message stamped with the current time
    pub fn new(
        message_type: impl Into<String>,
        name: impl Into<String>,
        default_status: &str,
        flush: Option<Arc<dyn FlushSink>>,
    ) -> Self {
        Self {
            message_type: message_type.into(),
            name: name.into(),
            timestamp: Timestamp::now(),
            state: Mutex::new(MessageState {
                status: default_status.to_string(),
                data: String::new(),
                ids: MessageIds::default(),
                completed: false,
            }),
            flush,
        }
    }

    /// Category, e.g. "Call" or "SQL"
    pub fn message_type(&self) -> &str {
        &self.message_type
    }

    /// Label within the category
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creation instant
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Current status
    pub fn status(&self) -> String {
        self.state.lock().status.clone()
    }

    /// Current payload
    pub fn data(&self) -> String {
        self.state.lock().data.clone()
    }

    /// Correlation ids assigned so far
    pub fn ids(&self) -> MessageIds {
        self.state.lock().ids.clone()
    }

    /// True once `complete` has run
    pub fn is_completed(&self) -> bool {
        self.state.lock().completed
    }

    /// True if a flush sink was attached at construction
    pub fn has_flush(&self) -> bool {
        self.flush.is_some()
    }

    /// Replace the status. Rejected once completed.
    pub fn set_status(&self, status: &str) -> Result<()> {
        let mut state = self.state.lock();
        if state.completed {
            return Err(self.rejected("status"));
        }
        state.status = status.to_string();
        Ok(())
    }

    /// Replace the payload. Rejected once completed.
    pub fn set_data(&self, data: &str) -> Result<()> {
        let mut state = self.state.lock();
        if state.completed {
            return Err(self.rejected("data"));
        }
        state.data = data.to_string();
        Ok(())
    }

    /// Assign this message's id
    pub fn set_message_id(&self, message_id: impl Into<String>) {
        self.state.lock().ids.message_id = message_id.into();
    }

    /// Assign the id of the trace root
    pub fn set_root_message_id(&self, root_message_id: impl Into<String>) {
        self.state.lock().ids.root_message_id = root_message_id.into();
    }

    /// Assign the id of the direct parent
    pub fn set_parent_message_id(&self, parent_message_id: impl Into<String>) {
        self.state.lock().ids.parent_message_id = parent_message_id.into();
    }

    /// Fail with `AlreadyCompleted` if the message is completed
    pub(crate) fn ensure_open(&self, field: &str) -> Result<()> {
        if self.is_completed() {
            return Err(self.rejected(field));
        }
        Ok(())
    }

    /// Flip to completed. Returns `true` only for the call that flipped it.
    pub(crate) fn mark_completed(&self) -> bool {
        let mut state = self.state.lock();
        if state.completed {
            return false;
        }
        state.completed = true;
        true
    }

    /// Pass a completed node to the sink, if there is one
    pub(crate) fn hand_off(&self, node: Arc<dyn Messager>) {
        if let Some(sink) = &self.flush {
            debug!(
                target: "calltree::flush",
                message_type = %self.message_type,
                name = %self.name,
                "Handing completed message to sink"
            );
            sink.flush(node);
        }
    }

    /// Copy the envelope into a record without children or duration
    pub(crate) fn record(&self, kind: MessageKind) -> MessageRecord {
        let state = self.state.lock().clone();
        MessageRecord {
            kind,
            message_type: self.message_type.clone(),
            name: self.name.clone(),
            timestamp: self.timestamp,
            status: state.status,
            data: state.data,
            ids: state.ids,
            completed: state.completed,
            duration_us: None,
            children: Vec::new(),
        }
    }

    fn rejected(&self, field: &str) -> Error {
        debug!(
            target: "calltree::message",
            message_type = %self.message_type,
            name = %self.name,
            field,
            "Rejected mutation of completed message"
        );
        Error::already_completed(self.message_type.as_str(), self.name.as_str())
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Message")
            .field("message_type", &self.message_type)
            .field("name", &self.name)
            .field("timestamp", &self.timestamp)
            .field("status", &state.status)
            .field("data", &state.data)
            .field("ids", &state.ids)
            .field("completed", &state.completed)
            .field("has_flush", &self.flush.is_some())
            .finish()
    }
}

/// Capability set shared by events and transactions
///
/// Child lists hold `Arc<dyn Messager>` so leaves and nested transactions
/// are stored and flushed uniformly. Every method takes `&self`; nodes are
/// internally synchronized and may be shared across threads.
pub trait Messager: Send + Sync + fmt::Debug {
    /// The envelope of this node
    fn message(&self) -> &Message;

    /// Leaf or composite
    fn kind(&self) -> MessageKind;

    /// Finalize the node. Idempotent: only the first call has any effect.
    fn complete(&self);

    /// Owned, serializable copy of this node and its subtree
    fn snapshot(&self) -> MessageRecord;

    /// Downcast to a transaction
    fn as_transaction(&self) -> Option<&Transaction> {
        None
    }

    /// Duration of the node, if it tracks one
    fn duration(&self) -> Option<Duration> {
        None
    }

    /// Replace the status. Rejected once completed.
    fn set_status(&self, status: &str) -> Result<()> {
        self.message().set_status(status)
    }

    /// Replace the payload. Rejected once completed.
    fn set_data(&self, data: &str) -> Result<()> {
        self.message().set_data(data)
    }

    /// True once `complete` has run
    fn is_completed(&self) -> bool {
        self.message().is_completed()
    }

    /// Category
    fn message_type(&self) -> &str {
        self.message().message_type()
    }

    /// Label
    fn name(&self) -> &str {
        self.message().name()
    }

    /// Creation instant
    fn timestamp(&self) -> Timestamp {
        self.message().timestamp()
    }

    /// Current status
    fn status(&self) -> String {
        self.message().status()
    }

    /// Current payload
    fn data(&self) -> String {
        self.message().data()
    }

    /// Correlation ids
    fn ids(&self) -> MessageIds {
        self.message().ids()
    }

    /// Assign this node's id. Allowed after completion.
    fn set_message_id(&self, message_id: &str) {
        self.message().set_message_id(message_id);
    }

    /// Assign the id of the trace root. Allowed after completion.
    fn set_root_message_id(&self, root_message_id: &str) {
        self.message().set_root_message_id(root_message_id);
    }

    /// Assign the id of the direct parent. Allowed after completion.
    fn set_parent_message_id(&self, parent_message_id: &str) {
        self.message().set_parent_message_id(parent_message_id);
    }
}
