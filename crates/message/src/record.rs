//! Owned snapshots of a call tree
//!
//! A `MessageRecord` is a plain, serializable copy of a node and its
//! subtree, taken at a point in time. Sinks that ship messages elsewhere
//! serialize records in whatever format they like; no wire format is
//! defined here.

use calltree_core::{MessageIds, MessageKind, Timestamp};
use serde::{Deserialize, Serialize};

/// Snapshot of one node and, for transactions, its children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Leaf or composite
    pub kind: MessageKind,
    /// Category
    #[serde(rename = "type")]
    pub message_type: String,
    /// Label
    pub name: String,
    /// Creation instant
    pub timestamp: Timestamp,
    /// Status at snapshot time
    pub status: String,
    /// Payload at snapshot time
    #[serde(default)]
    pub data: String,
    /// Correlation ids
    #[serde(default)]
    pub ids: MessageIds,
    /// Whether the node had completed
    pub completed: bool,
    /// Duration in microseconds (transactions only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_us: Option<u64>,
    /// Children in append order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MessageRecord>,
}

impl MessageRecord {
    /// Number of nodes below this one
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }

    /// Longest path from this node to a leaf, counting edges
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.depth())
            .max()
            .unwrap_or(0)
    }

    /// All nodes in depth-first pre-order, starting with this one
    pub fn iter(&self) -> impl Iterator<Item = &MessageRecord> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// First node (pre-order) with the given type and name
    pub fn find(&self, message_type: &str, name: &str) -> Option<&MessageRecord> {
        self.iter()
            .find(|r| r.message_type == message_type && r.name == name)
    }

    /// True if this node and every descendant had completed
    pub fn is_fully_completed(&self) -> bool {
        self.iter().all(|r| r.completed)
    }
}
