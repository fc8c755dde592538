//! Shared fixtures for integration tests
#![allow(dead_code)]

use entrobin::events::{Event, EventStore};

/// Build a store where every event carries one numeric feature.
/// Rows are (outcome, weight, is_test).
pub fn single_feature_store(feature: &str, rows: &[(&str, f64, bool)]) -> EventStore {
    let mut events = EventStore::new();
    for (i, &(outcome, weight, test)) in rows.iter().enumerate() {
        let mut event = Event::new(format!("e{}", i + 1), outcome, test);
        event.add_weighted_feature(feature, weight);
        events.push(event);
    }
    events
}

/// Training-only rows, shorthand for the common case.
pub fn training_store(feature: &str, rows: &[(&str, f64)]) -> EventStore {
    let rows: Vec<(&str, f64, bool)> = rows.iter().map(|&(o, w)| (o, w, false)).collect();
    single_feature_store(feature, &rows)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
