//! View-facing modules.
//!
//! - `display`: formats snapshots into text and reports only changed text.
//! - `notify`: single-slot notification sink with timed expiry.

pub mod display;
pub mod notify;

pub use display::{ChangeRecord, DisplaySync, FormatSpec, Formatter};
pub use notify::{Notification, NotificationSink, SinkEvent, SinkState};
