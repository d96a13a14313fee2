//! FleetPulse dashboard binary.
//!
//! - Config: first CLI argument, default `fleetpulse.yaml` (built-in dashboard if missing)
//! - stdout: JSON text-surface frames; stdin: UI commands
//! - Logs: stderr, filtered by `RUST_LOG`

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use fleetpulse_dashboard::{config, transport};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "fleetpulse.yaml".to_string());

    let cfg = match config::load_or_builtin(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, %path, "config load failed");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        %path,
        metrics = cfg.metrics.len(),
        period_ms = cfg.simulation.period_ms,
        "fleetpulse-dashboard starting"
    );

    match transport::run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "dashboard failed");
            ExitCode::FAILURE
        }
    }
}
