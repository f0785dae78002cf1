//! Storage resolution and dataset discovery
//!
//! Turns a user supplied path or URI into an object store handle plus the
//! path of the dataset inside that store, then lists the Parquet files that
//! make up the dataset.
//!
//! Supported locations:
//! - `/local/path`, `./relative/path`, `file:///abs/path` - local filesystem
//! - `s3://bucket/path`, `s3a://bucket/path` - AWS S3
//! - `r2://bucket/path` - Cloudflare R2 (S3-compatible)
//! - `gs://bucket/path`, `gcs://bucket/path` - Google Cloud Storage
//! - `az://container/path`, `abfss://container@account.dfs.core.windows.net/path` - Azure
//!
//! Any other [`ObjectStore`](object_store::ObjectStore) can be wrapped with
//! [`StorageLocation::new`].

mod dataset;
mod hive;
mod location;

pub use dataset::{DataFile, Dataset, METADATA_FILE_NAMES};
pub use hive::{partition_values, percent_decode, HIVE_DEFAULT_PARTITION};
pub use location::StorageLocation;
