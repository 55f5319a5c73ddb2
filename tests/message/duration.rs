//! Duration Tests
//!
//! Implicit durations track wall-clock time, explicit durations are kept
//! verbatim, and the duration origin decides where implicit time starts.

use crate::common::*;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn implicit_duration_matches_elapsed_time() {
    let start = Instant::now();
    let txn = Transaction::new("Call", "sleepy", None);
    thread::sleep(Duration::from_millis(120));
    txn.complete();
    let elapsed = start.elapsed();

    assert_close(txn.duration(), elapsed);
    assert!(txn.duration() >= Duration::from_millis(120));
}

#[test]
fn explicit_duration_is_exact() {
    let txn = Transaction::new("Call", "reported", None);
    txn.set_duration(Duration::from_micros(987_654)).unwrap();
    thread::sleep(Duration::from_millis(5));
    txn.complete();
    assert_eq!(txn.duration(), Duration::from_micros(987_654));
}

#[test]
fn explicit_duration_can_be_shorter_than_elapsed() {
    let txn = Transaction::new("Call", "fast-path", None);
    thread::sleep(Duration::from_millis(10));
    txn.set_duration(Duration::from_micros(1)).unwrap();
    txn.complete();
    assert_eq!(txn.duration(), Duration::from_micros(1));
}

#[test]
fn duration_is_zero_until_completion() {
    let txn = Transaction::new("Call", "open", None);
    thread::sleep(Duration::from_millis(2));
    assert_eq!(txn.duration(), Duration::ZERO);
    txn.complete();
    assert!(txn.duration() > Duration::ZERO);
}

#[test]
fn duration_frozen_after_completion() {
    let txn = Transaction::new("Call", "frozen", None);
    txn.complete();
    let first = txn.duration();
    thread::sleep(Duration::from_millis(5));
    txn.complete();
    assert_eq!(txn.duration(), first);
    assert!(txn.set_duration(Duration::from_secs(9)).is_err());
    assert_eq!(txn.duration(), first);
}

#[test]
fn duration_start_recorded_but_unused_by_default() {
    let txn = Transaction::new("Call", "default-origin", None);
    let start = Timestamp::now().saturating_sub(Duration::from_secs(3));
    txn.set_duration_start(start).unwrap();
    txn.complete();

    assert_eq!(txn.duration_start(), Some(start));
    assert!(txn.duration() < Duration::from_secs(1));
}

#[test]
fn duration_start_origin_measures_from_start() {
    let config = TransactionConfig::default().with_duration_origin(DurationOrigin::DurationStart);
    let txn = Transaction::with_config("Call", "resumed", None, config);
    txn.set_duration_start(Timestamp::now().saturating_sub(Duration::from_secs(3)))
        .unwrap();
    txn.complete();

    assert_close(txn.duration(), Duration::from_secs(3));
}

#[test]
fn explicit_duration_beats_duration_start_origin() {
    let config = TransactionConfig::default().with_duration_origin(DurationOrigin::DurationStart);
    let txn = Transaction::with_config("Call", "explicit", None, config);
    txn.set_duration_start(Timestamp::now().saturating_sub(Duration::from_secs(3)))
        .unwrap();
    txn.set_duration(Duration::from_millis(7)).unwrap();
    txn.complete();
    assert_eq!(txn.duration(), Duration::from_millis(7));
}

#[test]
fn snapshot_reports_duration_in_micros() {
    let txn = Transaction::new("Call", "measured", None);
    txn.set_duration(Duration::from_millis(3)).unwrap();
    txn.complete();
    assert_eq!(txn.snapshot().duration_us, Some(3_000));
}
