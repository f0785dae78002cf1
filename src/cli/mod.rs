//! CLI module
//!
//! Command-line interface for running conversions.
//!
//! ```text
//! parquet2json <SOURCE> [DESTINATION] [OPTIONS]
//! ```

mod commands;
mod runner;

pub use commands::{Cli, LogLevel};
pub use runner::Runner;
