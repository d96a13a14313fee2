//! Dashboard config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use fleetpulse_core::error::{FleetPulseError, Result};

pub use schema::{
    ActivityConfig, AlertConfig, DashboardConfig, FleetSection, MetricConfig,
    NotificationSection, SimulationSection,
};

pub fn load_from_file(path: &str) -> Result<DashboardConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| FleetPulseError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

/// Like [`load_from_file`], but a missing file yields the built-in dashboard.
pub fn load_or_builtin(path: &str) -> Result<DashboardConfig> {
    if !Path::new(path).exists() {
        tracing::info!(%path, "config file not found, using built-in dashboard");
        let cfg = DashboardConfig::builtin();
        cfg.validate()?;
        return Ok(cfg);
    }
    load_from_file(path)
}

pub fn load_from_str(s: &str) -> Result<DashboardConfig> {
    let cfg: DashboardConfig = serde_yaml::from_str(s)
        .map_err(|e| FleetPulseError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
