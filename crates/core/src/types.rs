//! Core identity and classification types
//!
//! This module defines the pieces of a message that are not behaviour:
//! - MessageKind: leaf event or composite transaction
//! - MessageIds: the externally assigned correlation ids
//! - Status sentinels shared by every message

use serde::{Deserialize, Serialize};

/// Status of a message that finished normally
pub const STATUS_SUCCESS: &str = "0";

/// Conventional status for a failed message
pub const STATUS_FAIL: &str = "-1";

/// Discriminates the two message variants in a call tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Leaf message without children
    Event,
    /// Composite message owning an ordered list of children
    Transaction,
}

impl MessageKind {
    /// Stable name for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Event => "event",
            MessageKind::Transaction => "transaction",
        }
    }

    /// True if messages of this kind can own children
    pub fn is_composite(&self) -> bool {
        matches!(self, MessageKind::Transaction)
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Correlation ids that place a message inside a larger, possibly
/// cross-process, trace.
///
/// All three are assigned by an outside correlation layer. Empty means
/// "not assigned". No format or uniqueness is checked here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageIds {
    /// Id of this message
    #[serde(default)]
    pub message_id: String,
    /// Id of the root message of the whole trace
    #[serde(default)]
    pub root_message_id: String,
    /// Id of the direct parent message, possibly in another process
    #[serde(default)]
    pub parent_message_id: String,
}

impl MessageIds {
    /// True if no id has been assigned
    pub fn is_empty(&self) -> bool {
        self.message_id.is_empty()
            && self.root_message_id.is_empty()
            && self.parent_message_id.is_empty()
    }

    /// True if this message continues a trace started elsewhere
    pub fn has_remote_parent(&self) -> bool {
        !self.parent_message_id.is_empty()
    }
}
