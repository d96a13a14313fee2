//! Line-oriented UI event source.
//!
//! Each stdin line is one user interaction. Button-style interactions
//! (actions, alerts, searches) are answered with a toast.

mod command;

pub use command::{parse_line, CommandError, UiCommand};
