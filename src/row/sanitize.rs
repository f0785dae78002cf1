//! Row sanitizing before serialization

use super::types::{Row, Value};

/// Prepare a row for JSON output.
///
/// Returns `None` when any top-level numeric field is infinite; such rows are
/// dropped whole. Otherwise null entries are removed from mappings and
/// sequences at every depth, keeping the order of what survives.
///
/// Non-finite floats that do not exclude the row (NaN anywhere, infinities
/// nested inside structs or lists) have no JSON representation and are elided
/// like nulls.
pub fn sanitize(row: Row) -> Option<Row> {
    if has_infinite_field(&row) {
        return None;
    }

    let fields = row
        .into_fields()
        .into_iter()
        .filter_map(|(name, value)| elide_nulls(value).map(|value| (name, value)))
        .collect();
    Some(Row::new(fields))
}

/// True if a top-level numeric field is positive or negative infinity
pub fn has_infinite_field(row: &Row) -> bool {
    row.fields()
        .iter()
        .any(|(_, value)| matches!(value, Value::Number(n) if n.is_infinite()))
}

fn elide_nulls(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Number(n) if !n.is_finite() => None,
        Value::Sequence(items) => Some(Value::Sequence(
            items.into_iter().filter_map(elide_nulls).collect(),
        )),
        Value::Mapping(entries) => Some(Value::Mapping(
            entries
                .into_iter()
                .filter_map(|(key, value)| elide_nulls(value).map(|value| (key, value)))
                .collect(),
        )),
        scalar => Some(scalar),
    }
}
