//! Egress side of the dashboard runtime.
//!
//! Snapshot consumers and the dashboard itself push [`Outbound`] frames into
//! a bounded queue; the transport loop drains it onto the text surface.

mod consumers;
mod types;

pub use consumers::{AlertForwarder, DisplayWriter, LegendWriter};
pub use types::{Egress, Inbound, Outbound};
