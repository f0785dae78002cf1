//! Tests for output module

use super::*;
use crate::error::ErrorKind;
use crate::row::{Row, Value};
use pretty_assertions::assert_eq;
use std::io::{self, Write};
use tempfile::tempdir;

// ============================================================================
// Writer Tests
// ============================================================================

#[test]
fn test_write_rows_as_lines() {
    let mut writer = NdjsonWriter::new(Vec::new(), "memory");
    writer
        .write_row(&Row::default().with_field("id", 1i64).with_field("region", "US"))
        .unwrap();
    writer
        .write_row(
            &Row::default()
                .with_field("id", 2i64)
                .with_field("amount", 3.5)
                .with_field("region", "EU"),
        )
        .unwrap();
    assert_eq!(writer.rows_written(), 2);

    let out = String::from_utf8(writer.finish().unwrap()).unwrap();
    assert_eq!(
        out,
        "{\"id\":1,\"region\":\"US\"}\n{\"id\":2,\"amount\":3.5,\"region\":\"EU\"}\n"
    );
}

#[test]
fn test_lines_parse_independently() {
    let mut writer = NdjsonWriter::new(Vec::new(), "memory");
    let nested = Row::default()
        .with_field("text", "line\nbreak \"quoted\" ünïcode")
        .with_field(
            "items",
            Value::Sequence(vec![Value::from(1i64), Value::from("two")]),
        );
    writer.write_row(&nested).unwrap();
    writer.write_row(&Row::default()).unwrap();

    let out = String::from_utf8(writer.finish().unwrap()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(parsed.is_object());
    }
    assert!(out.ends_with("{}\n"));
}

/// Accepts `limit` bytes, then fails every write
struct FailingWriter {
    written: Vec<u8>,
    limit: usize,
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written.len() + buf.len() > self.limit {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_write_failure_is_sink_error() {
    let inner = FailingWriter {
        written: Vec::new(),
        limit: 10,
    };
    let mut writer = NdjsonWriter::new(inner, "stdout");
    let row = Row::default().with_field("id", 1i64);

    writer.write_row(&row).unwrap();
    let err = writer.write_row(&row).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Sink);
    assert!(err.to_string().contains("stdout"));
    assert_eq!(writer.rows_written(), 1);
}

// ============================================================================
// Sink Tests
// ============================================================================

#[test]
fn test_sink_from_destination() {
    assert_eq!(Sink::from_destination(None), Sink::Stdout);
    assert_eq!(Sink::from_destination(Some("-")), Sink::Stdout);
    assert_eq!(
        Sink::from_destination(Some("out.json")),
        Sink::File("out.json".into())
    );
    assert_eq!(Sink::Stdout.to_string(), "stdout");
}

#[test]
fn test_file_sink_truncates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.json");
    std::fs::write(&path, "old content that is longer than the new one\n").unwrap();

    let sink = Sink::File(path.clone());
    let mut writer = NdjsonWriter::new(sink.open().unwrap(), sink.to_string());
    writer
        .write_row(&Row::default().with_field("id", 1i64))
        .unwrap();
    writer.finish().unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"id\":1}\n");
}

#[test]
fn test_file_sink_unwritable_path() {
    let dir = tempdir().unwrap();
    let sink = Sink::File(dir.path().join("missing-dir").join("out.json"));
    let err = sink.open().err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Sink);
    assert!(err.to_string().contains("missing-dir"));
}
