//! Property Tests
//!
//! Completion idempotence, child counts and explicit durations hold for
//! arbitrary inputs.

use crate::common::*;
use proptest::prelude::*;
use std::time::Duration;

fn arg_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9=&]{0,12}", 0..5)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn complete_n_times_flushes_once(n in 1usize..20) {
        let sink = CountingSink::new();
        let txn = Transaction::new("Call", "op", Some(sink.clone()));
        for _ in 0..n {
            txn.complete();
        }
        prop_assert_eq!(sink.calls(), 1);
    }

    #[test]
    fn explicit_duration_survives_completion(micros in 1u64..10_000_000_000) {
        let txn = Transaction::new("Call", "op", None);
        txn.set_duration(Duration::from_micros(micros)).unwrap();
        txn.complete();
        prop_assert_eq!(txn.duration(), Duration::from_micros(micros));
    }

    #[test]
    fn log_event_applies_first_two_args(args in arg_strategy()) {
        let txn = Transaction::new("Call", "op", None);
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        txn.log_event("Event", "e", &refs).unwrap();

        let children = txn.children();
        prop_assert_eq!(children.len(), 1);
        let child = &children[0];
        prop_assert!(child.is_completed());
        let expected_status = args.first().cloned().unwrap_or_else(|| STATUS_SUCCESS.to_string());
        let expected_data = args.get(1).cloned().unwrap_or_default();
        prop_assert_eq!(child.status(), expected_status);
        prop_assert_eq!(child.data(), expected_data);
    }

    #[test]
    fn child_order_matches_append_order(names in prop::collection::vec("[a-z]{1,8}", 0..40)) {
        let txn = Transaction::new("Call", "op", None);
        for name in &names {
            txn.log_event("Event", name.as_str(), &[]).unwrap();
        }
        let listed: Vec<String> = txn.children().iter().map(|c| c.name().to_string()).collect();
        prop_assert_eq!(listed, names);
    }
}
