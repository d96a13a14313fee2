//! Line codec for the stdio transport.
//!
//! - Inbound lines => `Inbound::Ui` (blank lines are skipped)
//! - `Outbound` frames => single-line JSON

use fleetpulse_core::error::{FleetPulseError, Result};

use crate::realtime::{Inbound, Outbound};
use crate::ui::parse_line;

/// Unparseable lines fail with `BAD_COMMAND`.
pub fn decode_line(line: &str) -> Result<Option<Inbound>> {
    Ok(parse_line(line)?.map(Inbound::Ui))
}

pub fn encode(out: &Outbound) -> Result<String> {
    serde_json::to_string(out)
        .map_err(|e| FleetPulseError::Internal(format!("json encode failed: {e}")))
}
