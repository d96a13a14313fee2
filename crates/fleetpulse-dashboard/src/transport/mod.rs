//! Transport layer (stdio).
//!
//! stdin carries UI commands, one per line; stdout is the text surface, one
//! JSON frame per line. Logs go to stderr.

pub mod codec;
pub mod stdio;

pub use stdio::run;
