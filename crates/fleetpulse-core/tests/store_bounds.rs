//! Metric store: registration errors and clamping.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use fleetpulse_core::sim::{FixedDeltas, Metric, MetricStore, RandomDeltas, StepKind};

#[test]
fn register_rejects_duplicates_and_bad_ranges() {
    let mut store = MetricStore::new(FixedDeltas::constant(0.0));
    store.register("onTime", 94.2, 80.0, 100.0, 1.0).unwrap();

    let dup = store.register("onTime", 90.0, 80.0, 100.0, 1.0).unwrap_err();
    assert_eq!(dup.code().as_str(), "DUPLICATE_METRIC");

    let inverted = store.register("fuel", 90.0, 100.0, 80.0, 1.0).unwrap_err();
    assert_eq!(inverted.code().as_str(), "INVALID_RANGE");

    let outside = store.register("fuel", 101.0, 80.0, 100.0, 1.0).unwrap_err();
    assert_eq!(outside.code().as_str(), "INVALID_RANGE");

    assert_eq!(store.len(), 1);
}

#[test]
fn advance_unknown_metric_fails() {
    let mut store = MetricStore::new(FixedDeltas::constant(1.0));
    let err = store.advance("ghost").unwrap_err();
    assert_eq!(err.code().as_str(), "UNKNOWN_METRIC");
}

#[test]
fn positive_walk_lands_exactly_on_max() {
    let mut store = MetricStore::new(FixedDeltas::constant(1.0));
    store.register("onTime", 94.2, 80.0, 100.0, 1.0).unwrap();
    for _ in 0..1000 {
        store.advance("onTime").unwrap();
    }
    assert_eq!(store.get("onTime").unwrap(), 100.0);
}

#[test]
fn overshoot_truncates_to_boundary_not_wraps() {
    let mut store = MetricStore::new(FixedDeltas::constant(-1.0));
    store.register("fuel", 80.4, 80.0, 100.0, 5.0).unwrap();
    assert_eq!(store.advance("fuel").unwrap(), 80.0);
    assert_eq!(store.advance("fuel").unwrap(), 80.0);
}

#[test]
fn random_walk_stays_in_range() {
    let mut store = MetricStore::new(RandomDeltas::seeded(7));
    store.register("onTime", 94.2, 80.0, 100.0, 3.0).unwrap();
    store.register("fuel", 89.7, 85.0, 90.0, 1.0).unwrap();
    store.register("flat", 5.0, 5.0, 5.0, 2.0).unwrap();
    for _ in 0..5000 {
        let snap = store.advance_all();
        for (name, value) in snap.iter() {
            let m = store.metric(name).unwrap();
            assert!(value >= m.min() && value <= m.max(), "{name}={value}");
        }
    }
    assert_eq!(store.get("flat").unwrap(), 5.0);
}

#[test]
fn zero_step_never_moves() {
    let mut store = MetricStore::new(RandomDeltas::seeded(1));
    store.register("still", 42.0, 0.0, 100.0, 0.0).unwrap();
    for _ in 0..100 {
        store.advance("still").unwrap();
    }
    assert_eq!(store.get("still").unwrap(), 42.0);
}

#[test]
fn advance_all_snapshot_lists_each_metric_once_in_order() {
    let mut store = MetricStore::new(FixedDeltas::constant(0.5));
    store.register("onTime", 94.2, 0.0, 100.0, 1.0).unwrap();
    store.register("fuelEfficiency", 89.7, 0.0, 100.0, 1.0).unwrap();
    store.register("maintenanceCompliance", 87.3, 0.0, 100.0, 0.5).unwrap();

    let snap = store.advance_all();
    let names: Vec<&str> = snap.names().collect();
    assert_eq!(names, ["onTime", "fuelEfficiency", "maintenanceCompliance"]);
    assert_eq!(snap.seq(), 1);
    assert_eq!(snap.get("maintenanceCompliance"), Some(87.55));
}

#[test]
fn snapshot_does_not_mutate() {
    let mut store = MetricStore::new(FixedDeltas::constant(1.0));
    store.register("onTime", 94.2, 80.0, 100.0, 1.0).unwrap();
    let a = store.snapshot();
    let b = store.snapshot();
    assert_eq!(a, b);
    assert_eq!(a.get("onTime"), Some(94.2));
    assert_eq!(a.seq(), 0);
}

#[test]
fn set_rejects_out_of_range_values() {
    let mut store = MetricStore::new(FixedDeltas::constant(0.0));
    store.register("onTime", 94.2, 80.0, 100.0, 1.0).unwrap();
    store.set("onTime", 85.0).unwrap();
    assert_eq!(store.get("onTime").unwrap(), 85.0);
    assert_eq!(store.set("onTime", 79.9).unwrap_err().code().as_str(), "INVALID_RANGE");
    assert_eq!(store.set("ghost", 1.0).unwrap_err().code().as_str(), "UNKNOWN_METRIC");
}

#[test]
fn discrete_steps_are_uniform_over_the_bound() {
    let mut store = MetricStore::new(RandomDeltas::seeded(11));
    store
        .insert(Metric::new("activeBuses", 500_000.0, 0.0, 1_000_000.0, 1.0, StepKind::Discrete).unwrap())
        .unwrap();

    let mut counts = [0u32; 3];
    let mut prev = store.get("activeBuses").unwrap();
    for _ in 0..90_000 {
        let next = store.advance("activeBuses").unwrap();
        let delta = (next - prev) as i64;
        assert!((-1..=1).contains(&delta), "delta {delta}");
        counts[(delta + 1) as usize] += 1;
        prev = next;
    }
    // each of -1, 0, +1 close to one third
    for c in counts {
        assert!((28_500..=31_500).contains(&c), "counts {counts:?}");
    }
}
