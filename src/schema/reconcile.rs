//! Canonical schema derivation

use super::fixups::{add_partition_columns, apply_fixups, normalize};
use crate::config::SchemaFixups;
use crate::error::{Error, Result};
use crate::storage::Dataset;
use arrow::datatypes::{Schema, SchemaRef};
use futures::StreamExt;
use object_store::{ObjectMeta, ObjectStore};
use parquet::arrow::async_reader::{ParquetObjectReader, ParquetRecordBatchStreamBuilder};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// The schema every file of one conversion is read under.
///
/// Cheap to clone; never changes once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalSchema {
    schema: SchemaRef,
}

impl CanonicalSchema {
    /// Wrap a schema, rejecting duplicate column names
    pub fn try_new(schema: Schema) -> std::result::Result<Self, String> {
        let mut seen = HashSet::new();
        for field in schema.fields() {
            if !seen.insert(field.name().as_str()) {
                return Err(format!("duplicate column '{}'", field.name()));
            }
        }
        Ok(Self {
            schema: Arc::new(schema),
        })
    }

    /// The underlying Arrow schema
    pub fn arrow_schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Check if a column exists
    pub fn contains(&self, name: &str) -> bool {
        self.schema.field_with_name(name).is_ok()
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.schema
            .fields()
            .iter()
            .map(|field| field.name().as_str())
            .collect()
    }
}

impl fmt::Display for CanonicalSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<String> = self
            .schema
            .fields()
            .iter()
            .map(|field| format!("{}: {}", field.name(), field.data_type()))
            .collect();
        write!(f, "[{}]", columns.join(", "))
    }
}

/// Derives a [`CanonicalSchema`] for a dataset
#[derive(Debug, Clone, Default)]
pub struct SchemaReconciler {
    fixups: SchemaFixups,
}

impl SchemaReconciler {
    /// Create a reconciler applying `fixups`
    pub fn new(fixups: SchemaFixups) -> Self {
        Self { fixups }
    }

    /// Read, normalize and fix up the dataset schema
    pub async fn reconcile(&self, dataset: &Dataset) -> Result<CanonicalSchema> {
        let location = dataset.location().to_string();

        let stored = self.read_schema(dataset).await?;
        let schema = normalize(&stored);
        let schema = add_partition_columns(schema, &dataset.partition_keys());
        let schema = apply_fixups(schema, &self.fixups);

        let canonical =
            CanonicalSchema::try_new(schema).map_err(|message| Error::schema(&location, message))?;
        debug!("Schema: {canonical}");
        Ok(canonical)
    }

    /// Footer metadata first, sampled rows second.
    async fn read_schema(&self, dataset: &Dataset) -> Result<Schema> {
        let store = dataset.location().store();
        let first = dataset
            .files()
            .first()
            .ok_or_else(|| Error::read(dataset.location().to_string(), "no data files found"))?;

        // The first data file doubles as the metadata source when there is no sidecar
        let (candidate, sampled_already) = match dataset.metadata_files().first() {
            Some(meta) => (meta, None),
            None => (&first.meta, Some(0)),
        };

        let mut last_error = match footer_schema(store, candidate).await {
            Ok(schema) => return Ok(schema),
            Err(e) => {
                let path = dataset.display_path(&candidate.location);
                warn!("Schema metadata unreadable in {path}: {e}; sampling data instead");
                format!("{path}: {e}")
            }
        };

        for (idx, file) in dataset.files().iter().enumerate() {
            if Some(idx) == sampled_already {
                continue;
            }
            match sample_schema(store, &file.meta).await {
                Ok(schema) => return Ok(schema),
                Err(e) => {
                    let path = dataset.display_path(&file.meta.location);
                    warn!("Could not sample schema from {path}: {e}");
                    last_error = format!("{path}: {e}");
                }
            }
        }

        Err(Error::schema(dataset.location().to_string(), last_error))
    }
}

/// Arrow schema from a Parquet footer, no row data read
async fn footer_schema(
    store: &Arc<dyn ObjectStore>,
    meta: &ObjectMeta,
) -> std::result::Result<Schema, parquet::errors::ParquetError> {
    let reader = ParquetObjectReader::new(Arc::clone(store), meta.clone());
    let builder = ParquetRecordBatchStreamBuilder::new(reader).await?;
    Ok(builder.schema().as_ref().clone())
}

/// Arrow schema of the first decoded row of a file
async fn sample_schema(
    store: &Arc<dyn ObjectStore>,
    meta: &ObjectMeta,
) -> std::result::Result<Schema, parquet::errors::ParquetError> {
    let reader = ParquetObjectReader::new(Arc::clone(store), meta.clone());
    let builder = ParquetRecordBatchStreamBuilder::new(reader)
        .await?
        .with_batch_size(1);
    let fallback = builder.schema().as_ref().clone();
    let mut stream = builder.build()?;
    match stream.next().await {
        Some(batch) => Ok(batch?.schema().as_ref().clone()),
        None => Ok(fallback),
    }
}
