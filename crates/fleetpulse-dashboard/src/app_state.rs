//! Dashboard state: every component, owned in one place.
//!
//! Built once from config, then driven by a single loop: timers through
//! [`Dashboard::poll`], user and alert input through [`Dashboard::handle`].
//! Nothing here spawns or sleeps, so tests drive it with manual time.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use fleetpulse_core::alert::{AlertSet, ThresholdWatch};
use fleetpulse_core::error::Result;
use fleetpulse_core::sim::{DeltaSource, Metric, MetricStore, SimulationClock};
use fleetpulse_core::time::SharedTime;
use fleetpulse_core::view::{ChangeRecord, DisplaySync, FormatSpec, NotificationSink, SinkEvent};

use crate::config::DashboardConfig;
use crate::fleet::{ActivityFeed, Roster};
use crate::obs::DashboardMetrics;
use crate::realtime::{AlertForwarder, DisplayWriter, Egress, Inbound, LegendWriter, Outbound};
use crate::ui::UiCommand;

const LEGEND_TEMPLATE: &str = "Active Buses ({value})";

pub struct Dashboard<D> {
    cfg: DashboardConfig,
    time: SharedTime,
    clock: SimulationClock<D>,
    sink: NotificationSink,
    feed: ActivityFeed,
    roster: Roster,
    egress: Egress,
    next_activity_ms: Option<u64>,
}

impl<D: DeltaSource> Dashboard<D> {
    /// Build application state.
    /// `inbound` is where threshold crossings are queued for [`Dashboard::handle`].
    pub fn new(
        cfg: DashboardConfig,
        deltas: D,
        time: SharedTime,
        egress: Egress,
        inbound: mpsc::Sender<Inbound>,
    ) -> Result<Self> {
        // 1) Metric store
        let mut store = MetricStore::new(deltas);
        for m in &cfg.metrics {
            store.insert(Metric::new(
                m.name.as_str(),
                m.initial,
                m.min,
                m.max,
                m.max_step,
                m.step,
            )?)?;
        }

        // 2) Clock + consumers (display, legend, alerts), notified in this order
        let mut clock = SimulationClock::new(store, Arc::clone(&time));

        let mut display = DisplaySync::new();
        for m in &cfg.metrics {
            if let Some(spec) = &m.format {
                display.configure_format(m.name.as_str(), spec.clone());
            }
        }
        clock.subscribe(DisplayWriter::new(display, egress.clone()));

        if let Some(legend_metric) = &cfg.fleet.legend_metric {
            let mut legend = DisplaySync::new();
            legend.configure_format(
                legend_metric.as_str(),
                FormatSpec::Template {
                    template: LEGEND_TEMPLATE.into(),
                    decimals: 0,
                },
            );
            clock.subscribe(LegendWriter::new(legend, egress.clone()));
        }

        if !cfg.alerts.is_empty() {
            let mut alerts = AlertSet::new();
            for a in &cfg.alerts {
                alerts.push(ThresholdWatch::new(
                    a.metric.as_str(),
                    a.threshold()?,
                    a.message.as_str(),
                ));
            }
            clock.subscribe(AlertForwarder::new(alerts, inbound, egress.clone()));
        }

        // 3) View-side state
        let sink = NotificationSink::new(Arc::clone(&time), cfg.notifications.exit_ms);
        let mut feed = ActivityFeed::new(cfg.activity_limit);
        for a in &cfg.activity {
            feed.record(a.text.as_str(), a.minutes_ago);
        }
        let roster = Roster::new(cfg.fleet.buses.clone(), cfg.fleet.routes.clone());

        Ok(Self {
            cfg,
            time,
            clock,
            sink,
            feed,
            roster,
            egress,
            next_activity_ms: None,
        })
    }

    /// Paint the initial view and start every timer.
    pub fn start(&mut self) -> Result<()> {
        self.clock.start(self.cfg.simulation.period_ms)?;

        self.egress.send(Outbound::Fleet {
            markers: self.roster.markers(),
            routes: self.roster.routes().to_vec(),
            legend: self.roster.legend(),
        });
        if !self.cfg.charts.is_empty() {
            self.egress.send(Outbound::Charts {
                charts: self.cfg.charts.clone(),
            });
        }
        self.clock.publish_current();
        let changes = self.feed.render();
        self.send_activity(changes);

        self.next_activity_ms = Some(
            self.time
                .now_ms()
                .saturating_add(self.cfg.simulation.activity_tick_ms),
        );
        tracing::info!(
            buses = self.roster.len(),
            activity = self.feed.len(),
            "dashboard started"
        );
        Ok(())
    }

    /// Run every timer whose deadline has passed.
    pub fn poll(&mut self) {
        let started = Instant::now();
        if let Some(snapshot) = self.clock.poll() {
            let metrics = self.egress.metrics();
            metrics.ticks.inc(&[]);
            metrics.tick_duration.observe(&[], started.elapsed());
            tracing::debug!(seq = snapshot.seq(), "simulation tick published");
        }

        let events = self.sink.poll();
        self.emit_toasts(events);

        if let Some(due) = self.next_activity_ms {
            let now = self.time.now_ms();
            if now >= due {
                let changes = self.feed.age(1);
                self.send_activity(changes);
                self.next_activity_ms =
                    Some(now.saturating_add(self.cfg.simulation.activity_tick_ms));
            }
        }
    }

    /// Earliest pending timer, if any.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        [
            self.clock.next_due_ms(),
            self.sink.next_deadline_ms(),
            self.next_activity_ms,
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn handle(&mut self, inbound: Inbound) -> ControlFlow<()> {
        match inbound {
            Inbound::Ui(cmd) => self.handle_command(cmd),
            Inbound::Alert { metric, message } => {
                self.egress
                    .metrics()
                    .alerts_fired
                    .inc(&[("metric", metric.as_str())]);
                self.feed.record(message.as_str(), 0);
                let changes = self.feed.render();
                self.send_activity(changes);
                self.post(message);
                ControlFlow::Continue(())
            }
        }
    }

    fn handle_command(&mut self, cmd: UiCommand) -> ControlFlow<()> {
        self.egress
            .metrics()
            .commands
            .inc(&[("command", cmd.name())]);
        tracing::debug!(command = cmd.name(), "ui command");

        if let Some(text) = cmd.notification_text() {
            self.post(text);
            return ControlFlow::Continue(());
        }
        match cmd {
            UiCommand::Dismiss => {
                let events = self.sink.dismiss();
                self.emit_toasts(events);
            }
            UiCommand::Stats => {
                self.egress.send(Outbound::Stats {
                    text: self.egress.metrics().render(),
                });
            }
            UiCommand::Quit => return ControlFlow::Break(()),
            _ => {}
        }
        ControlFlow::Continue(())
    }

    /// Show a toast for the configured display time.
    pub fn post(&mut self, message: impl Into<String>) {
        let events = self
            .sink
            .post(message, self.cfg.notifications.display_ms);
        self.emit_toasts(events);
    }

    /// Stop timers and clear the toast. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.clock.stop();
        let events = self.sink.dismiss();
        self.emit_toasts(events);
        self.next_activity_ms = None;
    }

    pub fn clock(&self) -> &SimulationClock<D> {
        &self.clock
    }

    pub fn sink(&self) -> &NotificationSink {
        &self.sink
    }

    pub fn feed(&self) -> &ActivityFeed {
        &self.feed
    }

    pub fn metrics(&self) -> &DashboardMetrics {
        self.egress.metrics()
    }

    fn send_activity(&mut self, changes: Vec<ChangeRecord>) {
        let removed = self.feed.take_removed();
        if changes.is_empty() && removed.is_empty() {
            return;
        }
        let dropped = self
            .egress
            .send_or_return(Outbound::Activity { changes, removed });
        if let Some(Outbound::Activity { changes, removed }) = dropped {
            self.feed.rollback(&changes, removed);
        }
    }

    fn emit_toasts(&self, events: Vec<SinkEvent>) {
        for event in events {
            self.egress
                .metrics()
                .notifications
                .inc(&[("event", event.kind())]);
            self.egress.send(Outbound::Toast { event });
        }
    }
}
