// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # parquet2json
//!
//! Streams Parquet datasets out as newline-delimited JSON.
//!
//! ## Features
//!
//! - **Any object store**: local paths, S3, R2, GCS and Azure, or any wrapped `ObjectStore`
//! - **Hive partitions**: `key=value` directories become string columns
//! - **Schema reconciliation**: one canonical schema across drifting files
//! - **Clean JSON**: nulls elided recursively, rows holding infinities skipped
//! - **Streaming**: row groups are decoded and written one batch at a time
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use parquet2json::{Converter, ConvertConfig, Sink, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let converter = Converter::new(ConvertConfig::default());
//!     let summary = converter
//!         .convert("s3://bucket/dataset/", &Sink::from_destination(Some("out.json")))
//!         .await?;
//!     println!("{} rows written", summary.rows_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! source ──► storage ──► schema ──► reader ──► row ──► output ──► sink
//!           resolve &   reconcile  batches   sanitize  NDJSON
//!           discover
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Conversion configuration
pub mod config;

/// Storage location resolution and dataset discovery
pub mod storage;

/// Schema reconciliation
pub mod schema;

/// Lazy batch reading
pub mod reader;

/// Row model and sanitizer
pub mod row;

/// NDJSON output
pub mod output;

/// Conversion orchestration
pub mod convert;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod test_support;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{ConvertConfig, SchemaFixups, StorageConfig};
pub use convert::{convert, ConversionSummary, Converter};
pub use error::{ConversionError, Error, ErrorKind, Result};
pub use output::Sink;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
