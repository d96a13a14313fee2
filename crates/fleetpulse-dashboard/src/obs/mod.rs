//! Lightweight in-process counters.
//!
//! Rendered in Prometheus text exposition format on the `stats` command and
//! at shutdown.

pub mod metrics;

pub use metrics::DashboardMetrics;
