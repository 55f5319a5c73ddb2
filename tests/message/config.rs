//! Configuration Tests
//!
//! Config files drive the tracer and flow down to nested transactions.

use crate::common::*;
use calltree::CONFIG_FILE_NAME;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn config_file_drives_tracer() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        "duration_origin = \"duration_start\"\ndefault_status = \"unknown\"\n",
    )
    .unwrap();

    let config = TransactionConfig::from_file(&path).unwrap();
    let tracer = Tracer::without_sink().with_config(config);
    let txn = tracer.new_transaction("Call", "configured");
    let child = txn.new_transaction("Call", "nested").unwrap();
    let event = child.new_event("Event", "leaf").unwrap();

    assert_eq!(txn.status(), "unknown");
    assert_eq!(child.status(), "unknown");
    assert_eq!(event.status(), "unknown");
    assert_eq!(child.config().duration_origin, DurationOrigin::DurationStart);

    child
        .set_duration_start(Timestamp::now().saturating_sub(Duration::from_secs(2)))
        .unwrap();
    child.complete();
    assert_close(child.duration(), Duration::from_secs(2));
}

#[test]
fn default_file_is_written_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    TransactionConfig::write_default_if_missing(&path).unwrap();
    let original = std::fs::read_to_string(&path).unwrap();
    assert!(original.contains("duration_origin"));

    TransactionConfig::write_default_if_missing(&path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    assert_eq!(
        TransactionConfig::from_file(&path).unwrap(),
        TransactionConfig::default()
    );
}

#[test]
fn invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "duration_origin = \"whenever\"\n").unwrap();

    match TransactionConfig::from_file(&path) {
        Err(Error::InvalidConfig(reason)) => assert!(reason.contains(CONFIG_FILE_NAME)),
        other => panic!("expected InvalidConfig, got {:?}", other),
    }
}
