//! Error types for calltree
//!
//! Building and completing a call tree is total over in-memory state, so the
//! only failures are rejected mutation of a completed node, a child that
//! would close a cycle, and configuration problems. We use `thiserror` for
//! the `Display` and `Error` implementations.

use std::io;
use thiserror::Error;

/// Result type alias for calltree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for calltree
#[derive(Debug, Error)]
pub enum Error {
    /// A completed message was mutated (status, data, duration or children)
    #[error("{message_type}/{name} is already completed")]
    AlreadyCompleted {
        /// Type of the completed message
        message_type: String,
        /// Name of the completed message
        name: String,
    },

    /// A transaction was given itself or one of its ancestors as a child
    #[error("{message_type}/{name} cannot contain itself")]
    CyclicChild {
        /// Type of the receiving transaction
        message_type: String,
        /// Name of the receiving transaction
        name: String,
    },

    /// Configuration value or file could not be understood
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error while reading or writing a config file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Build an `AlreadyCompleted` error for the given message
    pub fn already_completed(message_type: impl Into<String>, name: impl Into<String>) -> Self {
        Error::AlreadyCompleted {
            message_type: message_type.into(),
            name: name.into(),
        }
    }

    /// Build a `CyclicChild` error for the receiving transaction
    pub fn cyclic_child(message_type: impl Into<String>, name: impl Into<String>) -> Self {
        Error::CyclicChild {
            message_type: message_type.into(),
            name: name.into(),
        }
    }

    /// Build an `InvalidConfig` error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Error::InvalidConfig(reason.into())
    }

    /// True if this error reports mutation of a completed message
    pub fn is_already_completed(&self) -> bool {
        matches!(self, Error::AlreadyCompleted { .. })
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::InvalidConfig(e.to_string())
    }
}
