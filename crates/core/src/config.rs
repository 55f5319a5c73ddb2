//! Transaction configuration via `calltree.toml`
//!
//! Configuration is a plain value passed to constructors; nothing here is
//! global. A commented default file can be written next to an application's
//! other settings and edited by hand.

use crate::error::{Error, Result};
use crate::types::STATUS_SUCCESS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Conventional config file name
pub const CONFIG_FILE_NAME: &str = "calltree.toml";

/// Where an implicitly computed transaction duration starts
///
/// An explicit duration set by the caller always wins over either origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationOrigin {
    /// Elapsed time since the transaction was constructed
    #[default]
    Timestamp,
    /// Elapsed time since the recorded duration start, when one was set.
    /// Falls back to construction time otherwise.
    DurationStart,
}

/// Configuration shared by a transaction and every transaction nested in it.
///
/// # Example
///
/// ```toml
/// # "timestamp" (default) or "duration_start"
/// duration_origin = "timestamp"
///
/// # Initial status of every new message
/// default_status = "0"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionConfig {
    /// Start point used when `complete` computes the duration
    #[serde(default)]
    pub duration_origin: DurationOrigin,
    /// Status given to messages before the caller sets one
    #[serde(default = "default_status")]
    pub default_status: String,
}

fn default_status() -> String {
    STATUS_SUCCESS.to_string()
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            duration_origin: DurationOrigin::default(),
            default_status: default_status(),
        }
    }
}

impl TransactionConfig {
    /// Set the duration origin
    pub fn with_duration_origin(mut self, origin: DurationOrigin) -> Self {
        self.duration_origin = origin;
        self
    }

    /// Set the initial status of new messages
    pub fn with_default_status(mut self, status: impl Into<String>) -> Self {
        self.default_status = status.into();
        self
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.default_status.is_empty() {
            return Err(Error::invalid_config("default_status must not be empty"));
        }
        Ok(())
    }

    /// Default config file content with comments
    pub fn default_toml() -> &'static str {
        r#"# calltree configuration
#
# Start point of implicitly computed transaction durations:
#   "timestamp"      = time since the transaction was created (default)
#   "duration_start" = time since the caller-provided duration start,
#                      falling back to creation time when none was set
duration_origin = "timestamp"

# Initial status of every new event and transaction ("0" = success)
default_status = "0"
"#
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TransactionConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::InvalidConfig(reason) => {
                Error::InvalidConfig(format!("{}: {}", path.display(), reason))
            }
            other => other,
        })
    }

    /// Write the commented default file unless one already exists
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize to TOML and write to `path`
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::invalid_config(format!("cannot serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
