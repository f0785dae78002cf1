//! Fixture helpers for unit tests

use crate::config::StorageConfig;
use crate::storage::{Dataset, StorageLocation};
use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use std::path::Path;
use std::sync::Arc;

/// Write batches to a Parquet file, creating parent directories
pub fn write_parquet(path: &Path, batches: &[RecordBatch]) {
    write_parquet_with_row_groups(path, batches, 1024 * 1024);
}

/// Write batches with a row group size limit
pub fn write_parquet_with_row_groups(path: &Path, batches: &[RecordBatch], row_group_size: usize) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, parquet_bytes(batches, row_group_size)).unwrap();
}

/// Encode batches as a Parquet file in memory
pub fn parquet_bytes(batches: &[RecordBatch], row_group_size: usize) -> Vec<u8> {
    let props = WriterProperties::builder()
        .set_max_row_group_size(row_group_size)
        .build();
    let mut writer = ArrowWriter::try_new(Vec::new(), batches[0].schema(), Some(props)).unwrap();
    for batch in batches {
        writer.write(batch).unwrap();
    }
    writer.into_inner().unwrap()
}

/// `{id: Int64, amount: Float64}` batch
pub fn id_amount_batch(ids: &[i64], amounts: &[Option<f64>]) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("amount", DataType::Float64, true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(ids.to_vec())),
        Arc::new(Float64Array::from(amounts.to_vec())),
    ];
    RecordBatch::try_new(schema, columns).unwrap()
}

/// An `InMemory` store holding `files`, located at its `table/` prefix
pub async fn memory_location(files: &[(&str, Vec<u8>)]) -> StorageLocation {
    let store = Arc::new(InMemory::new());
    for (name, bytes) in files {
        store
            .put(
                &ObjectPath::from(format!("table/{name}")),
                PutPayload::from(bytes.clone()),
            )
            .await
            .unwrap();
    }
    StorageLocation::new(store, ObjectPath::from("table"), "memory:/", "memory")
}

/// Discover a local dataset
pub async fn local_dataset(path: &Path) -> Dataset {
    let location =
        StorageLocation::resolve(path.to_str().unwrap(), &StorageConfig::default()).unwrap();
    Dataset::discover(location).await.unwrap()
}
