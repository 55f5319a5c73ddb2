//! Correlation Id Tests
//!
//! Ids are assigned from outside, without validation, and may be assigned
//! after completion (typically by the sink).

use crate::common::*;
use std::sync::Arc;
use uuid::Uuid;

#[test]
fn ids_are_plain_assignments() {
    let txn = Transaction::new("Call", "op", None);
    txn.set_message_id("");
    txn.set_root_message_id("not a uuid at all");
    txn.set_parent_message_id("same");
    txn.set_message_id("same");

    let ids = txn.ids();
    assert_eq!(ids.message_id, "same");
    assert_eq!(ids.parent_message_id, "same");
    assert_eq!(ids.root_message_id, "not a uuid at all");
}

#[test]
fn new_messages_have_no_ids() {
    let txn = Transaction::new("Call", "op", None);
    let event = txn.new_event("Event", "e").unwrap();
    assert!(txn.ids().is_empty());
    assert!(event.ids().is_empty());
}

#[test]
fn sink_assigns_ids_after_completion() {
    let sink: Arc<dyn FlushSink> = Arc::new(|m: Arc<dyn Messager>| {
        if let Some(txn) = m.as_transaction() {
            txn.set_message_id(Uuid::new_v4().to_string());
        }
    });

    let txn = Transaction::new("Call", "op", Some(sink));
    txn.complete();

    let id = txn.ids().message_id;
    assert!(Uuid::parse_str(&id).is_ok());
}

#[test]
fn cross_process_parent_stitching() {
    let upstream = Transaction::new("Call", "client.request", None);
    let root_id = Uuid::new_v4().to_string();
    let call_id = Uuid::new_v4().to_string();
    upstream.set_root_message_id(root_id.clone());
    upstream.set_message_id(call_id.clone());

    // Downstream process receives the ids over the wire
    let downstream = Transaction::new("Service", "server.handle", None);
    downstream.set_root_message_id(upstream.ids().root_message_id);
    downstream.set_parent_message_id(upstream.ids().message_id);
    downstream.complete();
    upstream.complete();

    let ids = downstream.ids();
    assert_eq!(ids.root_message_id, root_id);
    assert_eq!(ids.parent_message_id, call_id);
    assert!(ids.has_remote_parent());
    assert_eq!(downstream.snapshot().ids, ids);
}
