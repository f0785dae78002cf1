//! Schema reconciliation tests

use super::*;
use crate::config::SchemaFixups;
use crate::error::ErrorKind;
use crate::test_support::{id_amount_batch, local_dataset, write_parquet};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::tempdir;

fn field_types(schema: &CanonicalSchema) -> Vec<(String, DataType)> {
    schema
        .arrow_schema()
        .fields()
        .iter()
        .map(|f| (f.name().clone(), f.data_type().clone()))
        .collect()
}

fn chromosome_batch(values: &[i64]) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("chromosome", DataType::Int64, false),
        Field::new("position", DataType::Int64, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(values.to_vec())),
        Arc::new(Int64Array::from(vec![100; values.len()])),
    ];
    RecordBatch::try_new(schema, columns).unwrap()
}

// ============================================================================
// Fixup Tests
// ============================================================================

#[test]
fn test_normalize_unwraps_dictionaries_and_nullability() {
    let schema = Schema::new(vec![
        Field::new(
            "tag",
            DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8)),
            false,
        ),
        Field::new("id", DataType::Int64, false),
    ]);
    let normalized = normalize(&schema);
    assert_eq!(normalized.field(0).data_type(), &DataType::Utf8);
    assert!(normalized.fields().iter().all(|f| f.is_nullable()));
}

#[test]
fn test_partition_columns_appended_once() {
    let schema = Schema::new(vec![
        Field::new("id", DataType::Int64, true),
        Field::new("year", DataType::Int32, true),
    ]);
    let schema = add_partition_columns(schema, &["year".to_string(), "region".to_string()]);
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, vec!["id", "year", "region"]);
    // File column wins over the partition key
    assert_eq!(schema.field(1).data_type(), &DataType::Int32);
    assert_eq!(schema.field(2).data_type(), &DataType::Utf8);
}

#[test]
fn test_apply_fixups_forces_strings_and_drops() {
    let schema = Schema::new(vec![
        Field::new("chromosome", DataType::Int64, true),
        Field::new("legacy", DataType::Float64, true),
        Field::new("name", DataType::LargeUtf8, true),
    ]);
    let fixups = SchemaFixups::default()
        .with_drop_column("legacy")
        .with_string_column("name");
    let fixed = apply_fixups(schema, &fixups);

    assert_eq!(fixed.fields().len(), 2);
    assert_eq!(fixed.field(0).data_type(), &DataType::Utf8);
    // Already a string type, left alone
    assert_eq!(fixed.field(1).data_type(), &DataType::LargeUtf8);
}

#[test]
fn test_drop_applies_after_string_fixup() {
    let schema = Schema::new(vec![Field::new("chromosome", DataType::Int64, true)]);
    let fixups = SchemaFixups::default().with_drop_column("chromosome");
    assert!(apply_fixups(schema, &fixups).fields().is_empty());
}

#[test]
fn test_canonical_schema_rejects_duplicates() {
    let schema = Schema::new(vec![
        Field::new("a", DataType::Int64, true),
        Field::new("a", DataType::Utf8, true),
    ]);
    assert!(CanonicalSchema::try_new(schema).is_err());
}

// ============================================================================
// Reconcile Tests
// ============================================================================

#[tokio::test]
async fn test_reconcile_hive_dataset() {
    let dir = tempdir().unwrap();
    write_parquet(
        &dir.path().join("region=US/part.parquet"),
        &[id_amount_batch(&[1], &[None])],
    );
    write_parquet(
        &dir.path().join("region=EU/part.parquet"),
        &[id_amount_batch(&[2], &[Some(3.5)])],
    );

    let dataset = local_dataset(dir.path()).await;
    let schema = SchemaReconciler::default().reconcile(&dataset).await.unwrap();

    assert_eq!(
        field_types(&schema),
        vec![
            ("id".to_string(), DataType::Int64),
            ("amount".to_string(), DataType::Float64),
            ("region".to_string(), DataType::Utf8),
        ]
    );
    assert!(schema.contains("region"));
}

#[tokio::test]
async fn test_reconcile_is_independent_of_creation_order() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    for (dir, order) in [(&first, ["a", "b", "c"]), (&second, ["c", "a", "b"])] {
        for name in order {
            write_parquet(
                &dir.path().join(format!("part={name}/data.parquet")),
                &[id_amount_batch(&[1], &[Some(1.0)])],
            );
        }
    }

    let reconciler = SchemaReconciler::default();
    let a = reconciler
        .reconcile(&local_dataset(first.path()).await)
        .await
        .unwrap();
    let b = reconciler
        .reconcile(&local_dataset(second.path()).await)
        .await
        .unwrap();
    let again = reconciler
        .reconcile(&local_dataset(first.path()).await)
        .await
        .unwrap();

    assert_eq!(a, b);
    assert_eq!(a, again);
}

#[tokio::test]
async fn test_reconcile_forces_chromosome_to_string() {
    let dir = tempdir().unwrap();
    write_parquet(
        &dir.path().join("part-0.parquet"),
        &[chromosome_batch(&[1, 2])],
    );

    let dataset = local_dataset(dir.path()).await;
    let schema = SchemaReconciler::default().reconcile(&dataset).await.unwrap();
    assert_eq!(
        field_types(&schema),
        vec![
            ("chromosome".to_string(), DataType::Utf8),
            ("position".to_string(), DataType::Int64),
        ]
    );

    let untouched = SchemaReconciler::new(SchemaFixups::none())
        .reconcile(&dataset)
        .await
        .unwrap();
    assert_eq!(
        untouched.arrow_schema().field(0).data_type(),
        &DataType::Int64
    );
}

#[tokio::test]
async fn test_reconcile_drops_configured_column() {
    let dir = tempdir().unwrap();
    write_parquet(
        &dir.path().join("data.parquet"),
        &[id_amount_batch(&[1], &[Some(2.0)])],
    );

    let dataset = local_dataset(dir.path()).await;
    let schema = SchemaReconciler::new(SchemaFixups::none().with_drop_column("amount"))
        .reconcile(&dataset)
        .await
        .unwrap();
    assert_eq!(schema.column_names(), vec!["id"]);
}

#[tokio::test]
async fn test_reconcile_prefers_sidecar_metadata() {
    let dir = tempdir().unwrap();
    let names = Arc::new(Schema::new(vec![Field::new("name", DataType::Utf8, true)]));
    let sidecar = RecordBatch::try_new(
        names,
        vec![Arc::new(StringArray::from(Vec::<Option<&str>>::new())) as ArrayRef],
    )
    .unwrap();
    write_parquet(&dir.path().join("_common_metadata"), &[sidecar]);
    write_parquet(
        &dir.path().join("data.parquet"),
        &[id_amount_batch(&[1], &[Some(2.0)])],
    );

    let dataset = local_dataset(dir.path()).await;
    let schema = SchemaReconciler::default().reconcile(&dataset).await.unwrap();
    assert_eq!(schema.column_names(), vec!["name"]);
}

#[tokio::test]
async fn test_reconcile_falls_back_to_sampling() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("_common_metadata"), b"not parquet").unwrap();
    write_parquet(
        &dir.path().join("data.parquet"),
        &[id_amount_batch(&[1], &[Some(2.0)])],
    );

    let dataset = local_dataset(dir.path()).await;
    let schema = SchemaReconciler::default().reconcile(&dataset).await.unwrap();
    assert_eq!(schema.column_names(), vec!["id", "amount"]);
}

#[tokio::test]
async fn test_reconcile_skips_corrupt_first_file() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.parquet"), b"garbage bytes").unwrap();
    write_parquet(
        &dir.path().join("b.parquet"),
        &[id_amount_batch(&[1], &[Some(2.0)])],
    );

    let dataset = local_dataset(dir.path()).await;
    let schema = SchemaReconciler::default().reconcile(&dataset).await.unwrap();
    assert_eq!(schema.column_names(), vec!["id", "amount"]);
}

#[tokio::test]
async fn test_reconcile_corrupt_dataset_is_schema_error() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.parquet"), b"garbage bytes").unwrap();

    let dataset = local_dataset(dir.path()).await;
    let err = SchemaReconciler::default()
        .reconcile(&dataset)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert!(err.to_string().contains("a.parquet"));
}
