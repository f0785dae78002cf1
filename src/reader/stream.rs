//! Lazy batch stream over a dataset

use super::coerce::coerce_batch;
use crate::error::{Error, Result};
use crate::schema::CanonicalSchema;
use crate::storage::Dataset;
use arrow::record_batch::RecordBatch;
use futures::stream::{self, BoxStream};
use futures::{StreamExt, TryStreamExt};
use object_store::{ObjectMeta, ObjectStore};
use parquet::arrow::async_reader::{ParquetObjectReader, ParquetRecordBatchStreamBuilder};
use parquet::arrow::ProjectionMask;
use std::sync::Arc;
use tracing::debug;

/// Batches of a dataset, already in the canonical schema
pub type BatchStream = BoxStream<'static, Result<RecordBatch>>;

/// A batch together with the file it was decoded from
#[derive(Debug, Clone)]
pub struct FileBatch {
    /// User-facing path of the source file
    pub path: Arc<str>,
    /// Rows in the canonical schema
    pub batch: RecordBatch,
}

/// [`FileBatch`]es of a dataset, in read order
pub type FileBatchStream = BoxStream<'static, Result<FileBatch>>;

#[derive(Debug, Clone)]
struct SourceFile {
    meta: ObjectMeta,
    partitions: Vec<(String, Option<String>)>,
    display: String,
}

/// Reads a dataset under a fixed [`CanonicalSchema`]
#[derive(Debug, Clone)]
pub struct DatasetReader {
    store: Arc<dyn ObjectStore>,
    files: Vec<SourceFile>,
    schema: CanonicalSchema,
    batch_size: usize,
}

impl DatasetReader {
    /// Read `dataset` under `schema`, `batch_size` rows at a time
    pub fn new(dataset: &Dataset, schema: CanonicalSchema, batch_size: usize) -> Self {
        let files = dataset
            .files()
            .iter()
            .map(|file| SourceFile {
                meta: file.meta.clone(),
                partitions: file.partitions.clone(),
                display: dataset.display_path(&file.meta.location),
            })
            .collect();

        Self {
            store: Arc::clone(dataset.location().store()),
            files,
            schema,
            batch_size: batch_size.max(1),
        }
    }

    /// Number of data files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Schema of every emitted batch
    pub fn schema(&self) -> &CanonicalSchema {
        &self.schema
    }

    /// Stream all batches in file order, then row-group order.
    ///
    /// A file is opened only once the previous one is exhausted. Each call
    /// starts a fresh pass over the dataset.
    pub fn stream(&self) -> BatchStream {
        self.file_batches().map_ok(|file| file.batch).boxed()
    }

    /// Like [`stream`](Self::stream), with each batch tagged by its file
    pub fn file_batches(&self) -> FileBatchStream {
        let store = Arc::clone(&self.store);
        let schema = self.schema.clone();
        let batch_size = self.batch_size;

        stream::iter(self.files.clone())
            .then(move |file| open_file(Arc::clone(&store), file, schema.clone(), batch_size))
            .try_flatten()
            .boxed()
    }
}

async fn open_file(
    store: Arc<dyn ObjectStore>,
    file: SourceFile,
    schema: CanonicalSchema,
    batch_size: usize,
) -> Result<FileBatchStream> {
    let reader = ParquetObjectReader::new(store, file.meta.clone());
    let builder = ParquetRecordBatchStreamBuilder::new(reader)
        .await
        .map_err(|e| Error::from_parquet(&file.display, e))?;

    // Only decode columns that survive into the canonical schema
    let indices: Vec<usize> = builder
        .schema()
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, field)| schema.contains(field.name()))
        .map(|(idx, _)| idx)
        .collect();
    let mask = ProjectionMask::roots(builder.parquet_schema(), indices);

    debug!(
        "Reading {} ({} row groups)",
        file.display,
        builder.metadata().num_row_groups()
    );

    let batches = builder
        .with_projection(mask)
        .with_batch_size(batch_size)
        .build()
        .map_err(|e| Error::from_parquet(&file.display, e))?;

    let target = Arc::clone(schema.arrow_schema());
    let SourceFile {
        partitions,
        display,
        ..
    } = file;
    let path: Arc<str> = Arc::from(display);

    Ok(batches
        .map(move |batch| {
            let batch = batch.map_err(|e| Error::from_parquet(path.as_ref(), e))?;
            let batch = coerce_batch(&batch, &target, &partitions)
                .map_err(|e| Error::format(path.as_ref(), e))?;
            Ok(FileBatch {
                path: Arc::clone(&path),
                batch,
            })
        })
        .boxed())
}
