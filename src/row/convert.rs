//! Arrow RecordBatch to [`Row`] conversion

use super::types::{Number, Row, Value};
use arrow::array::{Array, AsArray, StringViewArray};
use arrow::datatypes::{
    DataType, Float16Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
    UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// Lazily yields the rows of a batch, one [`Row`] per call
pub struct BatchRows<'a> {
    batch: &'a RecordBatch,
    names: Vec<String>,
    next: usize,
}

impl<'a> BatchRows<'a> {
    /// Iterate the rows of `batch`
    pub fn new(batch: &'a RecordBatch) -> Self {
        let names = batch
            .schema()
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect();
        Self {
            batch,
            names,
            next: 0,
        }
    }
}

impl Iterator for BatchRows<'_> {
    type Item = Result<Row, ArrowError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.batch.num_rows() {
            return None;
        }
        let row_idx = self.next;
        self.next += 1;

        let fields = self
            .names
            .iter()
            .zip(self.batch.columns())
            .map(|(name, column)| Ok((name.clone(), array_value(column.as_ref(), row_idx)?)))
            .collect::<Result<Vec<_>, ArrowError>>();
        Some(fields.map(Row::new))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.batch.num_rows().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

fn mismatch(array: &dyn Array) -> ArrowError {
    ArrowError::CastError(format!(
        "array does not match its data type {}",
        array.data_type()
    ))
}

macro_rules! primitive {
    ($array:expr, $row:expr, $ty:ty) => {
        $array
            .as_primitive_opt::<$ty>()
            .ok_or_else(|| mismatch($array))?
            .value($row)
    };
}

/// Convert a single array element to a [`Value`].
///
/// Types without a natural JSON shape (dates, timestamps, decimals,
/// durations, dictionaries) become their Arrow display string.
pub fn array_value(array: &dyn Array, row: usize) -> Result<Value, ArrowError> {
    if array.is_null(row) {
        return Ok(Value::Null);
    }

    let value = match array.data_type() {
        DataType::Null => Value::Null,

        DataType::Boolean => Value::Bool(
            array
                .as_boolean_opt()
                .ok_or_else(|| mismatch(array))?
                .value(row),
        ),

        DataType::Int8 => Value::from(i64::from(primitive!(array, row, Int8Type))),
        DataType::Int16 => Value::from(i64::from(primitive!(array, row, Int16Type))),
        DataType::Int32 => Value::from(i64::from(primitive!(array, row, Int32Type))),
        DataType::Int64 => Value::from(primitive!(array, row, Int64Type)),
        DataType::UInt8 => Value::from(u64::from(primitive!(array, row, UInt8Type))),
        DataType::UInt16 => Value::from(u64::from(primitive!(array, row, UInt16Type))),
        DataType::UInt32 => Value::from(u64::from(primitive!(array, row, UInt32Type))),
        DataType::UInt64 => Value::from(primitive!(array, row, UInt64Type)),

        DataType::Float16 => Value::Number(Number::Float(
            primitive!(array, row, Float16Type).to_f64(),
        )),
        DataType::Float32 => {
            Value::Number(Number::Float(f64::from(primitive!(array, row, Float32Type))))
        }
        DataType::Float64 => Value::Number(Number::Float(primitive!(array, row, Float64Type))),

        DataType::Utf8 => Value::from(
            array
                .as_string_opt::<i32>()
                .ok_or_else(|| mismatch(array))?
                .value(row),
        ),
        DataType::LargeUtf8 => Value::from(
            array
                .as_string_opt::<i64>()
                .ok_or_else(|| mismatch(array))?
                .value(row),
        ),
        DataType::Utf8View => Value::from(
            array
                .as_any()
                .downcast_ref::<StringViewArray>()
                .ok_or_else(|| mismatch(array))?
                .value(row),
        ),

        DataType::Binary => Value::String(
            BASE64.encode(
                array
                    .as_binary_opt::<i32>()
                    .ok_or_else(|| mismatch(array))?
                    .value(row),
            ),
        ),
        DataType::LargeBinary => Value::String(
            BASE64.encode(
                array
                    .as_binary_opt::<i64>()
                    .ok_or_else(|| mismatch(array))?
                    .value(row),
            ),
        ),
        DataType::FixedSizeBinary(_) => Value::String(
            BASE64.encode(
                array
                    .as_fixed_size_binary_opt()
                    .ok_or_else(|| mismatch(array))?
                    .value(row),
            ),
        ),

        DataType::List(_) => {
            let list = array.as_list_opt::<i32>().ok_or_else(|| mismatch(array))?;
            sequence(list.value(row).as_ref())?
        }
        DataType::LargeList(_) => {
            let list = array.as_list_opt::<i64>().ok_or_else(|| mismatch(array))?;
            sequence(list.value(row).as_ref())?
        }
        DataType::FixedSizeList(_, _) => {
            let list = array
                .as_fixed_size_list_opt()
                .ok_or_else(|| mismatch(array))?;
            sequence(list.value(row).as_ref())?
        }

        DataType::Struct(_) => {
            let arr = array.as_struct_opt().ok_or_else(|| mismatch(array))?;
            let mut entries = Vec::with_capacity(arr.num_columns());
            for (field, column) in arr.fields().iter().zip(arr.columns()) {
                entries.push((field.name().clone(), array_value(column.as_ref(), row)?));
            }
            Value::Mapping(entries)
        }

        DataType::Map(_, _) => {
            let map = array.as_map_opt().ok_or_else(|| mismatch(array))?;
            let entries = map.value(row);
            let keys = entries.column(0);
            let values = entries.column(1);
            let mut out = Vec::with_capacity(entries.len());
            for i in 0..entries.len() {
                let key = match array_value(keys.as_ref(), i)? {
                    Value::String(s) => s,
                    other => serde_json::to_string(&other)
                        .map_err(|e| ArrowError::JsonError(e.to_string()))?,
                };
                out.push((key, array_value(values.as_ref(), i)?));
            }
            Value::Mapping(out)
        }

        _ => Value::String(array_value_to_string(array, row)?),
    };

    Ok(value)
}

fn sequence(values: &dyn Array) -> Result<Value, ArrowError> {
    let mut items = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        items.push(array_value(values, i)?);
    }
    Ok(Value::Sequence(items))
}
