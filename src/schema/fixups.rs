//! Deterministic schema rewrites

use crate::config::SchemaFixups;
use arrow::datatypes::{DataType, Field, Schema};

/// Strip metadata, make every top-level field nullable and replace top-level
/// dictionary columns with their value type.
pub fn normalize(schema: &Schema) -> Schema {
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|field| {
            let data_type = match field.data_type() {
                DataType::Dictionary(_, value) => value.as_ref().clone(),
                other => other.clone(),
            };
            Field::new(field.name(), data_type, true)
        })
        .collect();
    Schema::new(fields)
}

/// Append partition keys that are not already file columns, typed as strings
pub fn add_partition_columns(schema: Schema, keys: &[String]) -> Schema {
    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    for key in keys {
        if schema.field_with_name(key).is_err() {
            fields.push(Field::new(key, DataType::Utf8, true));
        }
    }
    Schema::new(fields)
}

/// Apply the named fixups: string coercion first, then column drops
pub fn apply_fixups(schema: Schema, fixups: &SchemaFixups) -> Schema {
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|field| {
            if fixups.string_columns.contains(field.name()) && !is_string_type(field.data_type())
            {
                Field::new(field.name(), DataType::Utf8, true)
            } else {
                field.as_ref().clone()
            }
        })
        .filter(|field| !fixups.drop_columns.contains(field.name()))
        .collect();
    Schema::new(fields)
}

/// UTF-8 string types, in any offset width
pub fn is_string_type(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
    )
}
