//! Static fleet data shown next to the simulated metrics.
//!
//! The roster (map markers, routes, legend) and the charts are one-shot; the
//! activity feed ages on its own timer and renders through the same
//! change-record contract as metrics.

mod activity;
mod charts;
mod roster;

pub use activity::{format_age, ActivityEntry, ActivityFeed};
pub use charts::{default_charts, Chart, ChartKind, Series};
pub use roster::{Bus, BusStatus, LegendEntry, Marker, Roster, Route};
