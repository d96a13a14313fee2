use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;

use fleetpulse_core::error::FleetPulseError;
use fleetpulse_core::view::{ChangeRecord, SinkEvent};

use crate::fleet::{Chart, LegendEntry, Marker, Route};
use crate::obs::DashboardMetrics;
use crate::ui::UiCommand;

/// One JSON line on the text surface.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    /// One-shot map data.
    Fleet {
        markers: Vec<Marker>,
        routes: Vec<Route>,
        legend: Vec<LegendEntry>,
    },
    /// One-shot chart series.
    Charts { charts: Vec<Chart> },
    /// Metric text changes for one snapshot.
    Display { seq: u64, changes: Vec<ChangeRecord> },
    /// `Active Buses (N)` legend line.
    Legend { seq: u64, changes: Vec<ChangeRecord> },
    /// Feed text changes; `removed` lists keys of entries that left the feed.
    Activity {
        changes: Vec<ChangeRecord>,
        removed: Vec<String>,
    },
    Toast { event: SinkEvent },
    Stats { text: String },
    Error { code: String, msg: String },
}

impl Outbound {
    /// Error frame carrying the stable code.
    pub fn error(e: &FleetPulseError) -> Self {
        Outbound::Error {
            code: e.code().as_str().to_string(),
            msg: e.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Outbound::Fleet { .. } => "fleet",
            Outbound::Charts { .. } => "charts",
            Outbound::Display { .. } => "display",
            Outbound::Legend { .. } => "legend",
            Outbound::Activity { .. } => "activity",
            Outbound::Toast { .. } => "toast",
            Outbound::Stats { .. } => "stats",
            Outbound::Error { .. } => "error",
        }
    }
}

/// Work for the runtime loop that did not originate from a timer.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Ui(UiCommand),
    /// A threshold watch fired during a tick.
    Alert { metric: String, message: String },
}

/// Lossy sender for outbound frames: `try_send` only, drop and count if full.
#[derive(Clone)]
pub struct Egress {
    tx: mpsc::Sender<Outbound>,
    metrics: Arc<DashboardMetrics>,
}

impl Egress {
    pub fn new(tx: mpsc::Sender<Outbound>, metrics: Arc<DashboardMetrics>) -> Self {
        Self { tx, metrics }
    }

    pub fn send(&self, out: Outbound) {
        self.send_or_return(out);
    }

    /// Like [`Egress::send`], but a dropped frame is handed back so the caller
    /// can undo state that assumed delivery.
    pub fn send_or_return(&self, out: Outbound) -> Option<Outbound> {
        let kind = out.kind();
        match self.tx.try_send(out) {
            Ok(()) => None,
            Err(e) => {
                self.metrics.outbound_dropped.inc(&[("kind", kind)]);
                tracing::warn!(kind, "outbound queue full or closed, frame dropped");
                Some(e.into_inner())
            }
        }
    }

    pub fn metrics(&self) -> &DashboardMetrics {
        &self.metrics
    }
}
