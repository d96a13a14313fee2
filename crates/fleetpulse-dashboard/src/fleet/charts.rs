//! Static chart data, sent once at start.

use serde::{Deserialize, Serialize};

use fleetpulse_core::error::{FleetPulseError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Doughnut,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Series {
    #[serde(default)]
    pub label: String,
    pub data: Vec<f64>,
    /// One colour for a line; one per slice for a doughnut.
    #[serde(default)]
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Chart {
    pub id: String,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    /// Fixed y-axis bounds `[min, max]` for line charts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_range: Option<[f64; 2]>,
}

impl Chart {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(FleetPulseError::BadConfig("chart id must not be empty".into()));
        }
        if self.series.is_empty() {
            return Err(FleetPulseError::BadConfig(format!(
                "chart {} has no series",
                self.id
            )));
        }
        for s in &self.series {
            if s.data.len() != self.labels.len() {
                return Err(FleetPulseError::BadConfig(format!(
                    "chart {}: series '{}' has {} points for {} labels",
                    self.id,
                    s.label,
                    s.data.len(),
                    self.labels.len()
                )));
            }
            if s.data.iter().any(|v| !v.is_finite()) {
                return Err(FleetPulseError::BadConfig(format!(
                    "chart {}: series '{}' has a non-finite point",
                    self.id, s.label
                )));
            }
        }
        if let Some([lo, hi]) = self.y_range {
            if !lo.is_finite() || !hi.is_finite() || lo >= hi {
                return Err(FleetPulseError::BadConfig(format!(
                    "chart {}: y_range min must be below max",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

fn series(label: &str, data: &[f64], colors: &[&str]) -> Series {
    Series {
        label: label.into(),
        data: data.to_vec(),
        colors: colors.iter().map(|c| c.to_string()).collect(),
    }
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|l| l.to_string()).collect()
}

/// Monthly performance trend and the driver duty split.
pub fn default_charts() -> Vec<Chart> {
    vec![
        Chart {
            id: "performance".into(),
            kind: ChartKind::Line,
            labels: labels(&["Jan", "Feb", "Mar", "Apr", "May", "Jun"]),
            series: vec![
                series(
                    "On-Time Performance",
                    &[89.0, 92.0, 88.0, 94.0, 96.0, 94.0],
                    &["#3b82f6"],
                ),
                series(
                    "Fuel Efficiency",
                    &[85.0, 87.0, 89.0, 86.0, 88.0, 87.0],
                    &["#059669"],
                ),
            ],
            y_range: Some([80.0, 100.0]),
        },
        Chart {
            id: "drivers".into(),
            kind: ChartKind::Doughnut,
            labels: labels(&["On Duty", "Off Duty", "Break"]),
            series: vec![series(
                "",
                &[24.0, 6.0, 2.0],
                &["#059669", "#6b7280", "#f59e0b"],
            )],
            y_range: None,
        },
    ]
}
