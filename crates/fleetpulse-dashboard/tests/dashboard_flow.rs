//! End-to-end dashboard behaviour on manual time (no async runtime needed).

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use tokio::sync::mpsc;

use fleetpulse_core::sim::FixedDeltas;
use fleetpulse_core::time::ManualTime;
use fleetpulse_core::view::{SinkEvent, SinkState};
use fleetpulse_dashboard::app_state::Dashboard;
use fleetpulse_dashboard::config;
use fleetpulse_dashboard::obs::DashboardMetrics;
use fleetpulse_dashboard::realtime::{Egress, Inbound, Outbound};
use fleetpulse_dashboard::ui::UiCommand;

const CFG: &str = r#"
version: 1
simulation:
  period_ms: 1000
  activity_tick_ms: 60000
alerts:
  - { metric: onTime, above: 95, message: "On-time performance above 95%" }
activity:
  - { text: "Bus #156 delayed", minutes_ago: 2 }
"#;

struct Harness {
    time: ManualTime,
    dash: Dashboard<FixedDeltas>,
    out_rx: mpsc::Receiver<Outbound>,
    in_rx: mpsc::Receiver<Inbound>,
}

fn harness(cfg: &str, sample: f64) -> Harness {
    harness_with(cfg, FixedDeltas::constant(sample), 1024)
}

fn harness_with(cfg: &str, deltas: FixedDeltas, outbound_queue: usize) -> Harness {
    let cfg = config::load_from_str(cfg).unwrap();
    let time = ManualTime::new();
    let (out_tx, out_rx) = mpsc::channel(outbound_queue);
    let (in_tx, in_rx) = mpsc::channel(64);
    let egress = Egress::new(out_tx, Arc::new(DashboardMetrics::default()));
    let mut dash = Dashboard::new(
        cfg,
        deltas,
        time.shared(),
        egress,
        in_tx,
    )
    .unwrap();
    dash.start().unwrap();
    Harness {
        time,
        dash,
        out_rx,
        in_rx,
    }
}

fn drain(rx: &mut mpsc::Receiver<Outbound>) -> Vec<Outbound> {
    let mut frames = Vec::new();
    while let Ok(f) = rx.try_recv() {
        frames.push(f);
    }
    frames
}

fn toasts(frames: &[Outbound]) -> Vec<SinkEvent> {
    frames
        .iter()
        .filter_map(|f| match f {
            Outbound::Toast { event } => Some(event.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn start_paints_every_surface_once() {
    let mut h = harness(CFG, 1.0);
    let frames = drain(&mut h.out_rx);
    let kinds: Vec<&str> = frames.iter().map(Outbound::kind).collect();
    assert_eq!(kinds, ["fleet", "charts", "display", "legend", "activity"]);

    match &frames[0] {
        Outbound::Fleet {
            markers, routes, ..
        } => {
            assert_eq!(markers.len(), 8);
            assert_eq!(routes.len(), 1);
            assert_eq!(routes[0].name, "Route A - Downtown Loop");
            assert_eq!(routes[0].points.len(), 4);
        }
        other => panic!("unexpected frame {other:?}"),
    }
    match &frames[1] {
        Outbound::Charts { charts } => {
            let ids: Vec<&str> = charts.iter().map(|c| c.id.as_str()).collect();
            assert_eq!(ids, ["performance", "drivers"]);
            assert_eq!(charts[0].labels[0], "Jan");
            assert_eq!(charts[0].series[0].data, [89.0, 92.0, 88.0, 94.0, 96.0, 94.0]);
            assert_eq!(charts[1].series[0].data, [24.0, 6.0, 2.0]);
        }
        other => panic!("unexpected frame {other:?}"),
    }
    match &frames[2] {
        Outbound::Display { seq, changes } => {
            assert_eq!(*seq, 0);
            let texts: Vec<&str> = changes.iter().map(|c| c.new_text.as_str()).collect();
            assert_eq!(texts, ["94.2%", "89.7%", "87.3%", "24 Active"]);
            assert!(changes.iter().all(|c| c.old_text.is_none()));
        }
        other => panic!("unexpected frame {other:?}"),
    }
    match &frames[3] {
        Outbound::Legend { changes, .. } => assert_eq!(changes[0].new_text, "Active Buses (24)"),
        other => panic!("unexpected frame {other:?}"),
    }
    match &frames[4] {
        Outbound::Activity { changes, removed } => {
            assert_eq!(changes[0].new_text, "2 minutes ago");
            assert!(removed.is_empty());
        }
        other => panic!("unexpected frame {other:?}"),
    }
    assert_eq!(h.dash.next_deadline_ms(), Some(1000));
}

#[test]
fn tick_updates_metrics_legend_and_fires_alert() {
    let mut h = harness(CFG, 1.0);
    drain(&mut h.out_rx);

    h.time.set(999);
    h.dash.poll();
    assert!(drain(&mut h.out_rx).is_empty());

    h.time.set(1000);
    h.dash.poll();
    let frames = drain(&mut h.out_rx);
    match &frames[0] {
        Outbound::Display { seq, changes } => {
            assert_eq!(*seq, 1);
            assert_eq!(changes[0].name, "onTime");
            assert_eq!(changes[0].old_text.as_deref(), Some("94.2%"));
            assert_eq!(changes[0].new_text, "95.2%");
            assert_eq!(changes[3].new_text, "25 Active");
        }
        other => panic!("unexpected frame {other:?}"),
    }
    match &frames[1] {
        Outbound::Legend { changes, .. } => assert_eq!(changes[0].new_text, "Active Buses (25)"),
        other => panic!("unexpected frame {other:?}"),
    }

    let alert = h.in_rx.try_recv().expect("alert queued");
    assert_eq!(
        alert,
        Inbound::Alert {
            metric: "onTime".into(),
            message: "On-time performance above 95%".into(),
        }
    );
    assert!(h.dash.handle(alert).is_continue());

    let frames = drain(&mut h.out_rx);
    match &frames[0] {
        Outbound::Activity { changes, .. } => {
            assert_eq!(changes.len(), 1);
            assert_eq!(changes[0].new_text, "just now");
        }
        other => panic!("unexpected frame {other:?}"),
    }
    match &toasts(&frames)[0] {
        SinkEvent::Shown { notification } => {
            assert_eq!(notification.message, "On-time performance above 95%")
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(h.dash.metrics().alerts_fired.get(&[("metric", "onTime")]), 1);
    assert_eq!(h.dash.feed().len(), 2);
}

#[test]
fn unchanged_values_produce_no_display_frames() {
    let mut h = harness(CFG, 0.0);
    drain(&mut h.out_rx);

    for t in 1..=3 {
        h.time.set(t * 1000);
        h.dash.poll();
    }
    assert!(drain(&mut h.out_rx).is_empty());
    assert_eq!(h.dash.metrics().ticks.get(&[]), 3);
    assert_eq!(h.dash.clock().store().snapshot().seq(), 3);
}

#[test]
fn toast_preemption_and_expiry() {
    let mut h = harness(CFG, 0.0);
    drain(&mut h.out_rx);

    let first = Inbound::Ui(UiCommand::Action("Add Route".into()));
    let second = Inbound::Ui(UiCommand::Search("bus 156".into()));
    assert!(h.dash.handle(first).is_continue());
    assert!(h.dash.handle(second).is_continue());

    let events = toasts(&drain(&mut h.out_rx));
    let kinds: Vec<&str> = events.iter().map(SinkEvent::kind).collect();
    assert_eq!(kinds, ["shown", "preempted", "shown"]);
    assert_eq!(h.dash.sink().current().unwrap().message, "Searching for: bus 156");

    h.time.set(3000);
    h.dash.poll();
    assert_eq!(h.dash.sink().state(), SinkState::Expiring);
    h.time.set(3300);
    h.dash.poll();
    assert_eq!(h.dash.sink().state(), SinkState::Idle);

    let kinds: Vec<&str> = toasts(&drain(&mut h.out_rx))
        .iter()
        .map(SinkEvent::kind)
        .collect();
    assert_eq!(kinds, ["expiring", "removed"]);
    assert_eq!(
        h.dash.metrics().notifications.get(&[("event", "preempted")]),
        1
    );
}

#[test]
fn activity_ages_on_its_own_timer() {
    let mut h = harness(CFG, 0.0);
    drain(&mut h.out_rx);

    h.time.set(60_000);
    h.dash.poll();
    let frames = drain(&mut h.out_rx);
    let activity: Vec<_> = frames
        .iter()
        .filter_map(|f| match f {
            Outbound::Activity { changes, .. } => Some(changes.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0][0].new_text, "3 minutes ago");
}

#[test]
fn stats_dismiss_quit_and_shutdown() {
    let mut h = harness(CFG, 1.0);
    h.time.set(1000);
    h.dash.poll();
    drain(&mut h.out_rx);

    assert!(h.dash.handle(Inbound::Ui(UiCommand::Stats)).is_continue());
    match drain(&mut h.out_rx).pop() {
        Some(Outbound::Stats { text }) => {
            assert!(text.contains("fleetpulse_ticks_total 1"));
            assert!(text.contains("fleetpulse_commands_total{command=\"stats\"} 1"));
        }
        other => panic!("unexpected frame {other:?}"),
    }

    // dismiss with nothing visible is a no-op
    assert!(h.dash.handle(Inbound::Ui(UiCommand::Dismiss)).is_continue());
    assert!(toasts(&drain(&mut h.out_rx)).is_empty());

    assert!(h.dash.handle(Inbound::Ui(UiCommand::Quit)).is_break());

    h.dash.shutdown();
    h.dash.shutdown();
    assert!(!h.dash.clock().is_running());
    assert_eq!(h.dash.next_deadline_ms(), None);
}

#[test]
fn duplicate_metric_names_fail_at_build() {
    let cfg = config::load_from_str(
        r#"
version: 1
fleet: { legend_metric: null }
metrics:
  - { name: onTime, initial: 94.2, min: 0, max: 100, max_step: 1 }
  - { name: onTime, initial: 90, min: 0, max: 100, max_step: 1 }
"#,
    )
    .unwrap();
    let (out_tx, _out_rx) = mpsc::channel(8);
    let (in_tx, _in_rx) = mpsc::channel(8);
    let egress = Egress::new(out_tx, Arc::new(DashboardMetrics::default()));
    let err = Dashboard::new(
        cfg,
        FixedDeltas::constant(0.0),
        ManualTime::new().shared(),
        egress,
        in_tx,
    )
    .err()
    .expect("must fail");
    assert_eq!(err.code().as_str(), "DUPLICATE_METRIC");
}

#[test]
fn initial_value_outside_range_fails_at_build() {
    let cfg = config::load_from_str(
        r#"
version: 1
fleet: { legend_metric: null }
metrics:
  - { name: onTime, initial: 120, min: 0, max: 100, max_step: 1 }
"#,
    )
    .unwrap();
    let (out_tx, _out_rx) = mpsc::channel(8);
    let (in_tx, _in_rx) = mpsc::channel(8);
    let egress = Egress::new(out_tx, Arc::new(DashboardMetrics::default()));
    let err = Dashboard::new(
        cfg,
        FixedDeltas::constant(0.0),
        ManualTime::new().shared(),
        egress,
        in_tx,
    )
    .err()
    .expect("must fail");
    assert_eq!(err.code().as_str(), "INVALID_RANGE");
}

#[test]
fn frames_encode_as_tagged_json_lines() {
    let mut h = harness(CFG, 0.0);
    let frames = drain(&mut h.out_rx);
    let line = fleetpulse_dashboard::transport::codec::encode(&frames[2]).unwrap();
    let v: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(v["type"], "display");
    assert_eq!(v["changes"][0]["name"], "onTime");
    assert_eq!(v["changes"][0]["new_text"], "94.2%");
    assert!(v["changes"][0]["old_text"].is_null());
    assert!(!line.contains('\n'));
}

#[test]
fn dropped_display_frame_is_reported_on_the_next_tick() {
    // first tick moves every metric up, the second leaves them alone
    let deltas = FixedDeltas::new([1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
    // room for exactly the five start frames
    let mut h = harness_with(CFG, deltas, 5);

    h.time.set(1000);
    h.dash.poll();
    let metrics = h.dash.metrics();
    assert_eq!(metrics.outbound_dropped.get(&[("kind", "display")]), 1);
    assert_eq!(metrics.outbound_dropped.get(&[("kind", "legend")]), 1);
    assert_eq!(drain(&mut h.out_rx).len(), 5);

    h.time.set(2000);
    h.dash.poll();
    let frames = drain(&mut h.out_rx);
    match &frames[0] {
        Outbound::Display { seq, changes } => {
            assert_eq!(*seq, 2);
            assert_eq!(changes[0].name, "onTime");
            assert_eq!(changes[0].old_text.as_deref(), Some("94.2%"));
            assert_eq!(changes[0].new_text, "95.2%");
            assert_eq!(changes[3].new_text, "25 Active");
        }
        other => panic!("unexpected frame {other:?}"),
    }
    match &frames[1] {
        Outbound::Legend { changes, .. } => {
            assert_eq!(changes[0].old_text.as_deref(), Some("Active Buses (24)"));
            assert_eq!(changes[0].new_text, "Active Buses (25)");
        }
        other => panic!("unexpected frame {other:?}"),
    }
}

#[test]
fn activity_feed_stays_within_its_limit() {
    let cfg = format!("{CFG}activity_limit: 2\n");
    let mut h = harness(&cfg, 0.0);
    drain(&mut h.out_rx);

    for n in 1..=5 {
        let alert = Inbound::Alert {
            metric: "onTime".into(),
            message: format!("alert {n}"),
        };
        assert!(h.dash.handle(alert).is_continue());
        assert!(h.dash.feed().len() <= 2);
    }

    let texts: Vec<&str> = h.dash.feed().entries().iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, ["alert 5", "alert 4"]);

    let removed: Vec<String> = drain(&mut h.out_rx)
        .into_iter()
        .filter_map(|f| match f {
            Outbound::Activity { removed, .. } => Some(removed),
            _ => None,
        })
        .flatten()
        .collect();
    // the seeded entry (id 1), then alerts 1..=3 (ids 2..=4)
    assert_eq!(
        removed,
        ["activity.1", "activity.2", "activity.3", "activity.4"]
    );

    // aging touches only the entries still in the feed
    h.time.set(60_000);
    h.dash.poll();
    let aged: usize = drain(&mut h.out_rx)
        .iter()
        .map(|f| match f {
            Outbound::Activity { changes, .. } => changes.len(),
            _ => 0,
        })
        .sum();
    assert_eq!(aged, 2);
}
