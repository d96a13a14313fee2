//! FleetPulse core: metric simulation, display sync, and notifications.
//!
//! This crate holds the single-timeline engine behind the fleet dashboard:
//! a bounded random-walk metric store, a periodic clock that publishes
//! snapshots to subscribers, a text renderer that only reports changed text,
//! and a preempting notification sink. It carries no async runtime or I/O so
//! the dashboard binary and tests can drive it with either wall time or a
//! manually advanced clock.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All precondition violations surface as `FleetPulseError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod alert;
pub mod error;
pub mod sim;
pub mod time;
pub mod view;

/// Shared result type.
pub use error::{ErrorCode, FleetPulseError, Result};
