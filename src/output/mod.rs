//! Output module
//!
//! Newline-delimited JSON serialization.
//!
//! # Overview
//!
//! - [`Sink`]: where lines go (stdout or a file)
//! - [`NdjsonWriter`]: encodes rows one line at a time

mod sink;
mod writer;

pub use sink::Sink;
pub use writer::NdjsonWriter;

#[cfg(test)]
mod tests;
