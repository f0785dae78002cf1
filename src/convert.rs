//! Conversion orchestration
//!
//! Runs the pipeline stages in order: resolve the location, discover the
//! dataset, reconcile its schema, then stream rows through the sanitizer into
//! the output. A failing stage stops the run before the next one starts, and
//! the sink is only opened once the dataset is known to be readable.

use crate::config::ConvertConfig;
use crate::error::{Error, Result};
use crate::output::{NdjsonWriter, Sink};
use crate::reader::{DatasetReader, FileBatch};
use crate::row::{sanitize, BatchRows};
use crate::schema::SchemaReconciler;
use crate::storage::{Dataset, StorageLocation};
use futures::TryStreamExt;
use std::future::{self, Future};
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Counters for a finished conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Data files read
    pub files: usize,
    /// Rows decoded from the dataset
    pub rows_read: u64,
    /// Lines written to the sink
    pub rows_written: u64,
    /// Rows dropped for holding an infinite value
    pub rows_excluded: u64,
    /// Wall time of the whole run
    pub elapsed: Duration,
}

/// Converts Parquet datasets to newline-delimited JSON
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConvertConfig,
}

impl Converter {
    /// Create a converter with the given configuration
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Convert `source` into `sink`
    pub async fn convert(&self, source: &str, sink: &Sink) -> Result<ConversionSummary> {
        self.convert_until(source, sink, future::pending()).await
    }

    /// Convert `source` into `sink`, stopping between batches once `shutdown`
    /// resolves.
    ///
    /// An interrupted run still flushes everything written so far and reports
    /// [`Error::Interrupted`].
    pub async fn convert_until<F>(
        &self,
        source: &str,
        sink: &Sink,
        shutdown: F,
    ) -> Result<ConversionSummary>
    where
        F: Future<Output = ()>,
    {
        let started = Instant::now();
        let reader = self.prepare(source).await?;
        let output = sink.open()?;
        let summary = self
            .run(&reader, output, sink.to_string(), shutdown, started)
            .await?;

        info!(
            "Converted {source} to {sink} in {:.2} seconds",
            summary.elapsed.as_secs_f64()
        );
        Ok(summary)
    }

    /// Convert `source` into an arbitrary writer
    pub async fn convert_to_writer<W, F>(
        &self,
        source: &str,
        output: W,
        shutdown: F,
    ) -> Result<ConversionSummary>
    where
        W: Write,
        F: Future<Output = ()>,
    {
        let started = Instant::now();
        let reader = self.prepare(source).await?;
        self.run(&reader, output, "writer", shutdown, started).await
    }

    /// Convert a dataset in an already built store into an arbitrary writer.
    ///
    /// Use this for stores the URI resolver does not construct, such as an
    /// in-process [`InMemory`](object_store::memory::InMemory) store.
    pub async fn convert_location<W, F>(
        &self,
        location: StorageLocation,
        output: W,
        shutdown: F,
    ) -> Result<ConversionSummary>
    where
        W: Write,
        F: Future<Output = ()>,
    {
        let started = Instant::now();
        self.config.validate()?;
        let reader = self.open_dataset(location).await?;
        self.run(&reader, output, "writer", shutdown, started).await
    }

    /// Resolve, discover and reconcile, yielding a reader ready to stream
    async fn prepare(&self, source: &str) -> Result<DatasetReader> {
        self.config.validate()?;

        let location = StorageLocation::resolve(source, &self.config.storage)?;
        debug!("Resolved {source} to {location:?}");

        self.open_dataset(location).await
    }

    async fn open_dataset(&self, location: StorageLocation) -> Result<DatasetReader> {
        let dataset = Dataset::discover(location).await?;
        debug!(
            "Discovered {} data files under {}",
            dataset.files().len(),
            dataset.location()
        );

        let schema = SchemaReconciler::new(self.config.schema.clone())
            .reconcile(&dataset)
            .await?;

        Ok(DatasetReader::new(&dataset, schema, self.config.batch_size))
    }

    async fn run<W, F>(
        &self,
        reader: &DatasetReader,
        output: W,
        destination: impl Into<String>,
        shutdown: F,
        started: Instant,
    ) -> Result<ConversionSummary>
    where
        W: Write,
        F: Future<Output = ()>,
    {
        let mut writer = NdjsonWriter::new(output, destination);
        let mut summary = ConversionSummary {
            files: reader.file_count(),
            ..ConversionSummary::default()
        };

        let pumped = pump(reader, &mut writer, &mut summary, shutdown).await;
        summary.rows_written = writer.rows_written();

        // Flush before reporting, whichever way the pump ended
        let flushed = writer.finish();
        pumped?;
        flushed?;

        summary.elapsed = started.elapsed();
        Ok(summary)
    }
}

async fn pump<W, F>(
    reader: &DatasetReader,
    writer: &mut NdjsonWriter<W>,
    summary: &mut ConversionSummary,
    shutdown: F,
) -> Result<()>
where
    W: Write,
    F: Future<Output = ()>,
{
    let mut batches = reader.file_batches();
    tokio::pin!(shutdown);

    loop {
        let next = tokio::select! {
            biased;
            () = &mut shutdown => {
                return Err(Error::Interrupted {
                    rows_written: writer.rows_written(),
                });
            }
            next = batches.try_next() => next?,
        };
        let Some(FileBatch { path, batch }) = next else {
            return Ok(());
        };

        for row in BatchRows::new(&batch) {
            let row = row.map_err(|e| Error::format(path.as_ref(), e))?;
            summary.rows_read += 1;
            match sanitize(row) {
                Some(row) => writer.write_row(&row)?,
                None => summary.rows_excluded += 1,
            }
        }
    }
}

/// Convert `source` to `destination` with the default configuration.
///
/// `None` or `-` writes to standard output.
pub async fn convert(source: &str, destination: Option<&str>) -> Result<ConversionSummary> {
    Converter::default()
        .convert(source, &Sink::from_destination(destination))
        .await
}
