//! Core types for calltree
//!
//! This crate defines the foundational types shared by every message in a
//! call tree:
//! - Timestamp: microsecond wall-clock instant
//! - MessageKind / MessageIds: classification and correlation ids
//! - TransactionConfig: duration origin and default status
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod timestamp;
pub mod types;

pub use config::{DurationOrigin, TransactionConfig, CONFIG_FILE_NAME};
pub use error::{Error, Result};
pub use timestamp::Timestamp;
pub use types::{MessageIds, MessageKind, STATUS_FAIL, STATUS_SUCCESS};
