//! Schema reconciliation
//!
//! Produces the one Arrow schema every file of a dataset is read under.
//!
//! # Steps
//!
//! 1. Read a Parquet footer (sidecar metadata file, else the first data file),
//!    falling back to sampling rows when that fails
//! 2. Normalize: nullable top-level fields, no metadata, no dictionaries
//! 3. Append Hive partition keys as string columns
//! 4. Apply the configured column fixups

mod fixups;
mod reconcile;

pub use fixups::{add_partition_columns, apply_fixups, is_string_type, normalize};
pub use reconcile::{CanonicalSchema, SchemaReconciler};

#[cfg(test)]
mod tests;
