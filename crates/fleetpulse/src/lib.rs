//! Top-level facade crate for FleetPulse.
//!
//! Re-exports the simulation core and the dashboard library so users can depend on a single crate.

pub mod core {
    pub use fleetpulse_core::*;
}

pub mod dashboard {
    pub use fleetpulse_dashboard::*;
}
