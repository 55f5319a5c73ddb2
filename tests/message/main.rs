//! Call-Tree Integration Tests
//!
//! Exercises transactions, events and sinks through the public facade:
//! lifecycle, concurrent child aggregation, durations, flush hand-off,
//! correlation ids and configuration.

#[path = "../common/mod.rs"]
mod common;

mod config;
mod correlation;
mod duration;
mod properties;
