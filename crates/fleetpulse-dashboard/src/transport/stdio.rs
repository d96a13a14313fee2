//! Runtime loop over stdio.
//!
//! Responsibilities:
//! - Build the dashboard on wall time and paint the initial frames
//! - Read stdin commands on a side task (decode only; no state access)
//! - Single select loop: outbound writer, inbound commands/alerts, timers, ctrl-c
//!
//! Only the loop touches dashboard state, so a tick and its consumers always
//! finish before the next command or tick is handled.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tokio::sync::mpsc;
use tokio::time::Instant;

use fleetpulse_core::error::{FleetPulseError, Result};
use fleetpulse_core::sim::RandomDeltas;
use fleetpulse_core::time::{SharedTime, WallTime};

use crate::app_state::Dashboard;
use crate::config::DashboardConfig;
use crate::obs::DashboardMetrics;
use crate::realtime::{Egress, Inbound, Outbound};
use crate::transport::codec::{decode_line, encode};

const OUTBOUND_QUEUE: usize = 1024;
const INBOUND_QUEUE: usize = 256;

pub async fn run(cfg: DashboardConfig) -> Result<()> {
    let wall = WallTime::new();
    let time: SharedTime = Arc::new(wall);
    let metrics = Arc::new(DashboardMetrics::default());

    // ---- queues
    let (out_tx, mut out_rx) = mpsc::channel::<Outbound>(OUTBOUND_QUEUE);
    let (in_tx, mut in_rx) = mpsc::channel::<Inbound>(INBOUND_QUEUE);

    // ---- delta source
    let deltas = match cfg.simulation.seed {
        Some(seed) => RandomDeltas::seeded(seed),
        None => RandomDeltas::from_random_seed(),
    };
    tracing::info!(seed = deltas.seed(), "delta source seeded");

    let egress = Egress::new(out_tx.clone(), Arc::clone(&metrics));
    let mut dash = Dashboard::new(cfg, deltas, Arc::clone(&time), egress, in_tx.clone())?;
    dash.start()?;

    // ---- stdin reader (stdin EOF does not stop the dashboard; `in_tx` stays alive here)
    tokio::spawn(read_commands(in_tx.clone(), out_tx.clone()));

    let mut stdout = tokio::io::stdout();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let deadline = dash
            .next_deadline_ms()
            .map(|ms| Instant::from_std(wall.instant_at(ms)));

        tokio::select! {
            // outbound writer
            maybe_out = out_rx.recv() => {
                match maybe_out {
                    Some(out) => write_frame(&mut stdout, &out).await?,
                    None => break,
                }
            }

            // commands + alerts
            maybe_in = in_rx.recv() => {
                let Some(inbound) = maybe_in else { break; };
                if dash.handle(inbound).is_break() {
                    tracing::info!("quit requested");
                    break;
                }
            }

            // timers (clock tick, toast expiry, activity aging)
            _ = sleep_until(deadline) => {
                dash.poll();
            }

            res = &mut shutdown => {
                if let Err(e) = res {
                    tracing::warn!(error = %e, "ctrl-c listener failed");
                }
                tracing::info!("shutdown signal received");
                break;
            }
        }
    }

    dash.shutdown();
    while let Ok(out) = out_rx.try_recv() {
        write_frame(&mut stdout, &out).await?;
    }
    drop(in_tx);

    tracing::info!(stats = %dash.metrics().render(), "fleetpulse-dashboard stopped");
    Ok(())
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

async fn write_frame(stdout: &mut Stdout, out: &Outbound) -> Result<()> {
    let mut line = encode(out)?;
    line.push('\n');
    stdout
        .write_all(line.as_bytes())
        .await
        .map_err(|e| FleetPulseError::Internal(format!("stdout write failed: {e}")))?;
    stdout
        .flush()
        .await
        .map_err(|e| FleetPulseError::Internal(format!("stdout flush failed: {e}")))
}

async fn read_commands(tx: mpsc::Sender<Inbound>, out: mpsc::Sender<Outbound>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "stdin read failed");
                break;
            }
        };
        match decode_line(&line) {
            Ok(Some(inbound)) => {
                if tx.send(inbound).await.is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, line = %line, "rejected command");
                let _ = out.send(Outbound::error(&e)).await;
            }
        }
    }
    tracing::debug!("stdin closed");
}
