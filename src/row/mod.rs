//! Row model
//!
//! Rows are materialized one at a time from decoded Arrow batches into a
//! small tagged value tree, sanitized, and handed to the serializer.
//!
//! # Overview
//!
//! - [`Value`] / [`Row`]: nested values with ordered mappings
//! - [`BatchRows`]: lazily turns a `RecordBatch` into rows
//! - [`sanitize`]: null elision and non-finite filtering

mod convert;
mod sanitize;
mod types;

pub use convert::{array_value, BatchRows};
pub use sanitize::{has_infinite_field, sanitize};
pub use types::{Number, Row, Value};
