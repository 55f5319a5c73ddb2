//! Call-tree messages for calltree
//!
//! This crate builds and finalizes in-process call trees:
//! - Message / Messager: the envelope and the capability set every node has
//! - Event: leaf node
//! - Transaction: composite node with children and a duration
//! - FlushSink: one-time hand-off of completed roots (MemorySink, LogSink)
//! - MessageRecord: owned, serializable snapshot of a subtree
//! - Tracer: factory binding roots to a sink and configuration
//!
//! ```
//! use calltree_message::{MemorySink, Messager, Transaction};
//!
//! let sink = MemorySink::new();
//! let txn = Transaction::new("Call", "op", Some(sink.clone()));
//! txn.log_event("Event", "stepA", &["ok"]).unwrap();
//! txn.complete();
//! assert_eq!(sink.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod event;
pub mod flush;
pub mod message;
pub mod record;
pub mod tracer;
pub mod transaction;

pub use event::Event;
pub use flush::{FlushSink, LogSink, MemorySink};
pub use message::{Message, Messager};
pub use record::MessageRecord;
pub use tracer::{Tracer, TracerMetrics};
pub use transaction::Transaction;
