//! Snapshot consumers subscribed to the simulation clock.

use tokio::sync::mpsc;

use fleetpulse_core::alert::AlertSet;
use fleetpulse_core::sim::{MetricSnapshot, SnapshotConsumer};
use fleetpulse_core::view::DisplaySync;

use super::types::{Egress, Inbound, Outbound};

/// Renders metric text and ships the changes. A dropped frame is rolled back
/// out of the render cache so the next tick reports it again.
pub struct DisplayWriter {
    display: DisplaySync,
    egress: Egress,
}

impl DisplayWriter {
    pub fn new(display: DisplaySync, egress: Egress) -> Self {
        Self { display, egress }
    }
}

impl SnapshotConsumer for DisplayWriter {
    fn on_snapshot(&mut self, snapshot: &MetricSnapshot) {
        let metrics = self.egress.metrics();
        for (name, value) in snapshot.iter() {
            metrics
                .metric_value_milli
                .set(&[("metric", name)], (value * 1000.0).round() as i64);
        }

        let changes = self.display.render(snapshot);
        if changes.is_empty() {
            return;
        }
        for c in &changes {
            metrics.display_changes.inc(&[("metric", c.name.as_str())]);
        }
        let dropped = self.egress.send_or_return(Outbound::Display {
            seq: snapshot.seq(),
            changes,
        });
        if let Some(Outbound::Display { changes, .. }) = dropped {
            self.display.rollback(&changes);
        }
    }
}

/// Second rendering of the active-bus metric for the map legend.
pub struct LegendWriter {
    display: DisplaySync,
    egress: Egress,
}

impl LegendWriter {
    pub fn new(display: DisplaySync, egress: Egress) -> Self {
        Self { display, egress }
    }
}

impl SnapshotConsumer for LegendWriter {
    fn on_snapshot(&mut self, snapshot: &MetricSnapshot) {
        let changes = self.display.render(snapshot);
        if changes.is_empty() {
            return;
        }
        let dropped = self.egress.send_or_return(Outbound::Legend {
            seq: snapshot.seq(),
            changes,
        });
        if let Some(Outbound::Legend { changes, .. }) = dropped {
            self.display.rollback(&changes);
        }
    }
}

/// Forwards threshold crossings to the runtime loop, which owns the sink.
pub struct AlertForwarder {
    alerts: AlertSet,
    tx: mpsc::Sender<Inbound>,
    egress: Egress,
}

impl AlertForwarder {
    pub fn new(alerts: AlertSet, tx: mpsc::Sender<Inbound>, egress: Egress) -> Self {
        Self { alerts, tx, egress }
    }
}

impl SnapshotConsumer for AlertForwarder {
    fn on_snapshot(&mut self, snapshot: &MetricSnapshot) {
        for crossing in self.alerts.observe(snapshot) {
            let inbound = Inbound::Alert {
                metric: crossing.metric,
                message: crossing.message,
            };
            if self.tx.try_send(inbound).is_err() {
                self.egress.metrics().outbound_dropped.inc(&[("kind", "alert")]);
                tracing::warn!("inbound queue full or closed, alert dropped");
            }
        }
    }
}
