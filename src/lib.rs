//! calltree - in-process call trees for distributed tracing
//!
//! A transaction is a unit of work that collects nested events and child
//! transactions, measures its duration, and on completion hands itself to a
//! flush sink exactly once. Shipping, sampling and storage are the sink's
//! business; this crate only builds and finalizes the tree.
//!
//! # Quick Start
//!
//! ```
//! use calltree::{MemorySink, Messager, Tracer};
//!
//! let sink = MemorySink::new();
//! let tracer = Tracer::new(sink.clone());
//!
//! let txn = tracer.new_transaction("Call", "op");
//! txn.log_event("Event", "stepA", &["ok"])?;
//! txn.log_event("Event", "stepB", &["ok", "{\"n\":1}"])?;
//! txn.complete();
//!
//! assert_eq!(sink.len(), 1);
//! assert_eq!(txn.children().len(), 2);
//! # Ok::<(), calltree::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `calltree-core`: timestamps, ids, configuration and errors
//! - `calltree-message`: events, transactions, sinks and snapshots

pub use calltree_core::*;
pub use calltree_message::*;
