//! Dataset reader
//!
//! Streams every row group of every file of a dataset, in file order and
//! row-group order, coerced to the canonical schema.

mod coerce;
mod stream;

pub use coerce::coerce_batch;
pub use stream::{BatchStream, DatasetReader, FileBatch, FileBatchStream};
