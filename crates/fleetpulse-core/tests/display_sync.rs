//! Display sync: change records and idempotent re-renders.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use fleetpulse_core::sim::MetricSnapshot;
use fleetpulse_core::view::{ChangeRecord, DisplaySync, FormatSpec, Formatter};

fn snap(pairs: &[(&str, f64)]) -> MetricSnapshot {
    MetricSnapshot::from_pairs(0, pairs.iter().copied())
}

#[test]
fn second_identical_render_is_empty() {
    let mut display = DisplaySync::new();
    display.configure_format("onTime", Formatter::fixed_percent(1));

    let first = display.render(&snap(&[("onTime", 94.2)]));
    assert_eq!(
        first,
        vec![ChangeRecord {
            name: "onTime".into(),
            old_text: None,
            new_text: "94.2%".into(),
        }]
    );
    assert!(display.render(&snap(&[("onTime", 94.2)])).is_empty());

    let third = display.render(&snap(&[("onTime", 94.3)]));
    assert_eq!(
        third,
        vec![ChangeRecord {
            name: "onTime".into(),
            old_text: Some("94.2%".into()),
            new_text: "94.3%".into(),
        }]
    );
}

#[test]
fn sub_precision_moves_produce_no_change() {
    let mut display = DisplaySync::new();
    display.configure_format("onTime", Formatter::fixed_percent(1));
    display.render(&snap(&[("onTime", 94.21)]));
    assert!(display.render(&snap(&[("onTime", 94.24)])).is_empty());
    assert_eq!(display.text("onTime"), Some("94.2%"));
}

#[test]
fn metrics_without_format_are_skipped() {
    let mut display = DisplaySync::new();
    display.configure_format("activeBuses", FormatSpec::Template {
        template: "{value} Active".into(),
        decimals: 0,
    });
    let changes = display.render(&snap(&[("onTime", 94.2), ("activeBuses", 24.0)]));
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].new_text, "24 Active");
}

#[test]
fn render_value_without_format_fails() {
    let mut display = DisplaySync::new();
    let err = display.render_value("onTime", 94.2).unwrap_err();
    assert_eq!(err.code().as_str(), "UNKNOWN_FORMAT");
}

#[test]
fn custom_formatter_and_reset() {
    let mut display = DisplaySync::new();
    display.configure_format("delay", Formatter::new(|v| format!("{v:.0} min")));
    assert_eq!(display.render_value("delay", 3.4).unwrap().unwrap().new_text, "3 min");
    assert!(display.render_value("delay", 3.2).unwrap().is_none());

    display.reset();
    let again = display.render_value("delay", 3.2).unwrap().unwrap();
    assert_eq!(again.old_text, None);
}

#[test]
fn render_follows_snapshot_order() {
    let mut display = DisplaySync::new();
    display.configure_format("b", Formatter::count());
    display.configure_format("a", Formatter::count());
    let changes = display.render(&snap(&[("b", 1.0), ("a", 2.0)]));
    let names: Vec<&str> = changes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["b", "a"]);
}

#[test]
fn rolled_back_changes_are_reported_again() {
    let mut display = DisplaySync::new();
    display.configure_format("onTime", Formatter::fixed_percent(1));
    display.configure_format("fuel", Formatter::fixed_percent(1));
    display.render(&snap(&[("onTime", 94.2)]));

    // the view never saw these
    let lost = display.render(&snap(&[("onTime", 95.2), ("fuel", 89.7)]));
    assert_eq!(lost.len(), 2);
    display.rollback(&lost);
    assert_eq!(display.text("onTime"), Some("94.2%"));
    assert_eq!(display.text("fuel"), None);

    let again = display.render(&snap(&[("onTime", 95.2), ("fuel", 89.7)]));
    assert_eq!(again, lost);
}

#[test]
fn forgotten_keys_stop_rendering() {
    let mut display = DisplaySync::new();
    display.configure_format("activity.1", FormatSpec::Count);
    display.render(&snap(&[("activity.1", 3.0)]));

    assert!(display.forget("activity.1"));
    assert!(!display.forget("activity.1"));
    assert!(!display.has_format("activity.1"));
    assert!(display.render(&snap(&[("activity.1", 4.0)])).is_empty());
}
