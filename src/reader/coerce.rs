//! Per-batch coercion to the canonical schema

use arrow::array::{new_null_array, ArrayRef, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::sync::Arc;

/// Rebuild `batch` under `schema`.
///
/// Columns present in the batch are cast when their type differs. Columns
/// named by a partition key are filled with that partition's value. Anything
/// else is all nulls.
pub fn coerce_batch(
    batch: &RecordBatch,
    schema: &SchemaRef,
    partitions: &[(String, Option<String>)],
) -> Result<RecordBatch, ArrowError> {
    let num_rows = batch.num_rows();
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    for field in schema.fields() {
        let column = if let Some(column) = batch.column_by_name(field.name()) {
            if column.data_type() == field.data_type() {
                Arc::clone(column)
            } else {
                cast(column, field.data_type()).map_err(|e| {
                    ArrowError::CastError(format!(
                        "column '{}' ({} -> {}): {e}",
                        field.name(),
                        column.data_type(),
                        field.data_type()
                    ))
                })?
            }
        } else if let Some((_, value)) = partitions.iter().find(|(key, _)| key == field.name()) {
            partition_column(value.as_deref(), field.data_type(), num_rows)?
        } else {
            new_null_array(field.data_type(), num_rows)
        };
        columns.push(column);
    }

    let options = RecordBatchOptions::new().with_row_count(Some(num_rows));
    RecordBatch::try_new_with_options(Arc::clone(schema), columns, &options)
}

/// Constant column holding one partition value
fn partition_column(
    value: Option<&str>,
    data_type: &DataType,
    num_rows: usize,
) -> Result<ArrayRef, ArrowError> {
    let strings: ArrayRef = Arc::new(StringArray::from(vec![value; num_rows]));
    if data_type == &DataType::Utf8 {
        Ok(strings)
    } else {
        cast(&strings, data_type)
    }
}
