use std::collections::HashSet;

use serde::Deserialize;

use fleetpulse_core::alert::Threshold;
use fleetpulse_core::error::{FleetPulseError, Result};
use fleetpulse_core::sim::StepKind;
use fleetpulse_core::view::FormatSpec;

use crate::fleet::{default_charts, Bus, BusStatus, Chart, Route};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    pub version: u32,

    #[serde(default)]
    pub simulation: SimulationSection,

    #[serde(default)]
    pub notifications: NotificationSection,

    #[serde(default = "default_metrics")]
    pub metrics: Vec<MetricConfig>,

    #[serde(default)]
    pub alerts: Vec<AlertConfig>,

    #[serde(default)]
    pub fleet: FleetSection,

    #[serde(default = "default_charts")]
    pub charts: Vec<Chart>,

    #[serde(default = "default_activity")]
    pub activity: Vec<ActivityConfig>,

    /// Entries kept in the activity feed; the oldest are evicted first.
    #[serde(default = "default_activity_limit")]
    pub activity_limit: usize,
}

impl DashboardConfig {
    /// Built-in dashboard (used when no config file exists).
    pub fn builtin() -> Self {
        Self {
            version: 1,
            simulation: SimulationSection::default(),
            notifications: NotificationSection::default(),
            metrics: default_metrics(),
            alerts: Vec::new(),
            fleet: FleetSection::default(),
            charts: default_charts(),
            activity: default_activity(),
            activity_limit: default_activity_limit(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(FleetPulseError::UnsupportedVersion);
        }
        if self.metrics.is_empty() {
            return Err(FleetPulseError::BadConfig("metrics must not be empty".into()));
        }

        self.simulation.validate()?;
        self.notifications.validate()?;

        let names: HashSet<&str> = self.metrics.iter().map(|m| m.name.as_str()).collect();
        for m in &self.metrics {
            if m.name.trim().is_empty() {
                return Err(FleetPulseError::BadConfig("metric name must not be empty".into()));
            }
            if let Some(FormatSpec::Template { template, .. }) = &m.format {
                if !template.contains("{value}") {
                    return Err(FleetPulseError::BadConfig(format!(
                        "metrics[{}].format.template must contain {{value}}",
                        m.name
                    )));
                }
            }
        }
        for a in &self.alerts {
            if !names.contains(a.metric.as_str()) {
                return Err(FleetPulseError::BadConfig(format!(
                    "alert refers to unknown metric: {}",
                    a.metric
                )));
            }
            a.threshold()?;
        }
        self.fleet.validate()?;

        let mut chart_ids = HashSet::new();
        for c in &self.charts {
            c.validate()?;
            if !chart_ids.insert(c.id.as_str()) {
                return Err(FleetPulseError::BadConfig(format!(
                    "duplicate chart id: {}",
                    c.id
                )));
            }
        }

        if !(1..=100).contains(&self.activity_limit) {
            return Err(FleetPulseError::BadConfig(
                "activity_limit must be between 1 and 100".into(),
            ));
        }

        if let Some(legend) = &self.fleet.legend_metric {
            if !names.contains(legend.as_str()) {
                return Err(FleetPulseError::BadConfig(format!(
                    "fleet.legend_metric refers to unknown metric: {legend}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSection {
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,

    /// Fixed seed for a reproducible run; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_activity_tick_ms")]
    pub activity_tick_ms: u64,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            period_ms: default_period_ms(),
            seed: None,
            activity_tick_ms: default_activity_tick_ms(),
        }
    }
}

impl SimulationSection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=3_600_000).contains(&self.period_ms) {
            return Err(FleetPulseError::BadConfig(
                "simulation.period_ms must be between 100 and 3600000".into(),
            ));
        }
        if !(1000..=3_600_000).contains(&self.activity_tick_ms) {
            return Err(FleetPulseError::BadConfig(
                "simulation.activity_tick_ms must be between 1000 and 3600000".into(),
            ));
        }
        Ok(())
    }
}

fn default_period_ms() -> u64 {
    30000
}
fn default_activity_tick_ms() -> u64 {
    60000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationSection {
    #[serde(default = "default_display_ms")]
    pub display_ms: u64,

    #[serde(default = "default_exit_ms")]
    pub exit_ms: u64,
}

impl Default for NotificationSection {
    fn default() -> Self {
        Self {
            display_ms: default_display_ms(),
            exit_ms: default_exit_ms(),
        }
    }
}

impl NotificationSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=60000).contains(&self.display_ms) {
            return Err(FleetPulseError::BadConfig(
                "notifications.display_ms must be between 1 and 60000".into(),
            ));
        }
        if self.exit_ms > 5000 {
            return Err(FleetPulseError::BadConfig(
                "notifications.exit_ms must be at most 5000".into(),
            ));
        }
        Ok(())
    }
}

fn default_display_ms() -> u64 {
    3000
}
fn default_exit_ms() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricConfig {
    pub name: String,
    pub initial: f64,
    pub min: f64,
    pub max: f64,
    pub max_step: f64,
    #[serde(default)]
    pub step: StepKind,
    /// Metrics without a format are simulated but not rendered.
    #[serde(default)]
    pub format: Option<FormatSpec>,
}

fn percent_metric(name: &str, initial: f64, max_step: f64) -> MetricConfig {
    MetricConfig {
        name: name.into(),
        initial,
        min: 0.0,
        max: 100.0,
        max_step,
        step: StepKind::Continuous,
        format: Some(FormatSpec::Percent { decimals: 1 }),
    }
}

fn default_metrics() -> Vec<MetricConfig> {
    vec![
        percent_metric("onTime", 94.2, 1.0),
        percent_metric("fuelEfficiency", 89.7, 1.0),
        percent_metric("maintenanceCompliance", 87.3, 0.5),
        MetricConfig {
            name: "activeBuses".into(),
            initial: 24.0,
            min: 20.0,
            max: 28.0,
            max_step: 1.0,
            step: StepKind::Discrete,
            format: Some(FormatSpec::Template {
                template: "{value} Active".into(),
                decimals: 0,
            }),
        },
    ]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlertConfig {
    pub metric: String,
    #[serde(default)]
    pub below: Option<f64>,
    #[serde(default)]
    pub above: Option<f64>,
    pub message: String,
}

impl AlertConfig {
    pub fn threshold(&self) -> Result<Threshold> {
        match (self.below, self.above) {
            (Some(level), None) => Ok(Threshold::Below(level)),
            (None, Some(level)) => Ok(Threshold::Above(level)),
            _ => Err(FleetPulseError::BadConfig(format!(
                "alert on {} must set exactly one of below/above",
                self.metric
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FleetSection {
    #[serde(default = "default_buses")]
    pub buses: Vec<Bus>,

    #[serde(default = "default_routes")]
    pub routes: Vec<Route>,

    /// Metric whose value feeds the `Active Buses (N)` legend line.
    #[serde(default = "default_legend_metric")]
    pub legend_metric: Option<String>,
}

impl Default for FleetSection {
    fn default() -> Self {
        Self {
            buses: default_buses(),
            routes: default_routes(),
            legend_metric: default_legend_metric(),
        }
    }
}

impl FleetSection {
    pub fn validate(&self) -> Result<()> {
        let finite = |[lat, lng]: [f64; 2]| lat.is_finite() && lng.is_finite();
        for b in &self.buses {
            if !finite([b.lat, b.lng]) {
                return Err(FleetPulseError::BadConfig(format!(
                    "bus {} has a non-finite position",
                    b.id
                )));
            }
        }
        for r in &self.routes {
            if r.points.len() < 2 {
                return Err(FleetPulseError::BadConfig(format!(
                    "route {} needs at least two points",
                    r.name
                )));
            }
            if !r.points.iter().copied().all(finite) {
                return Err(FleetPulseError::BadConfig(format!(
                    "route {} has a non-finite point",
                    r.name
                )));
            }
        }
        Ok(())
    }
}

fn default_routes() -> Vec<Route> {
    vec![Route {
        name: "Route A - Downtown Loop".into(),
        color: "#3b82f6".into(),
        points: vec![
            [40.7580, -73.9855],
            [40.7505, -73.9934],
            [40.7282, -73.9942],
            [40.7128, -74.0060],
        ],
    }]
}

fn default_legend_metric() -> Option<String> {
    Some("activeBuses".into())
}

fn bus(id: &str, lat: f64, lng: f64, status: BusStatus, route: &str) -> Bus {
    Bus {
        id: id.into(),
        lat,
        lng,
        status,
        route: route.into(),
    }
}

fn default_buses() -> Vec<Bus> {
    use BusStatus::*;
    vec![
        bus("001", 40.7580, -73.9855, Active, "A"),
        bus("156", 40.7505, -73.9934, Delayed, "B"),
        bus("247", 40.7282, -73.9942, Active, "A"),
        bus("089", 40.7589, -73.9851, Maintenance, "C"),
        bus("123", 40.7614, -73.9776, Active, "C"),
        bus("199", 40.7505, -73.9857, Active, "B"),
        bus("077", 40.7282, -74.0776, Delayed, "A"),
        bus("234", 40.7128, -74.0060, Active, "B"),
    ]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActivityConfig {
    pub text: String,
    #[serde(default)]
    pub minutes_ago: u32,
}

fn default_activity_limit() -> usize {
    10
}

fn default_activity() -> Vec<ActivityConfig> {
    [
        ("Bus #156 reported a 7 minute delay on Route B", 2),
        ("Bus #089 checked in for scheduled maintenance", 15),
        ("Driver shift change completed at Downtown depot", 32),
    ]
    .into_iter()
    .map(|(text, minutes_ago)| ActivityConfig {
        text: text.into(),
        minutes_ago,
    })
    .collect()
}
