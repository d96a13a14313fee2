//! FleetPulse dashboard library entry.
//!
//! This crate wires config, the simulation core, fleet data, UI commands and
//! the stdio transport into a runnable dashboard. It is consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod fleet;
pub mod obs;
pub mod realtime;
pub mod transport;
pub mod ui;
