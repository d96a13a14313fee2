//! Simulation modules (store + clock).
//!
//! - `store`: named metrics with clamped bounded-random-walk steps.
//! - `delta`: seeded and scripted sources of unit samples.
//! - `snapshot`: immutable per-tick copies handed to consumers.
//! - `clock`: period scheduler that ticks the store and notifies subscribers.

pub mod clock;
pub mod delta;
pub mod snapshot;
pub mod store;

pub use clock::{SimulationClock, SnapshotConsumer, SubscriptionId};
pub use delta::{DeltaSource, FixedDeltas, RandomDeltas};
pub use snapshot::{MetricSnapshot, SnapshotEntry};
pub use store::{Metric, MetricStore, StepKind};
