//! Hive-style `key=value` path segments

use object_store::path::Path as ObjectPath;
use percent_encoding::percent_decode_str;

/// Value written by Hive/Spark for a null partition key
pub const HIVE_DEFAULT_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";

/// Partition key/value pairs encoded in the directories between `root` and
/// `file`, outermost first. Segments without `=` are ignored.
pub fn partition_values(root: &ObjectPath, file: &ObjectPath) -> Vec<(String, Option<String>)> {
    let Some(parts) = file.prefix_match(root) else {
        return Vec::new();
    };
    let segments: Vec<String> = parts.map(|part| part.as_ref().to_string()).collect();

    // Last segment is the file name itself
    let dirs = segments.split_last().map_or(&[][..], |(_, dirs)| dirs);

    dirs.iter()
        .filter_map(|segment| {
            let (key, value) = segment.split_once('=')?;
            if key.is_empty() {
                return None;
            }
            let value = percent_decode(value);
            let value = (value != HIVE_DEFAULT_PARTITION).then_some(value);
            Some((percent_decode(key), value))
        })
        .collect()
}

/// Decode `%XX` escapes, leaving malformed escapes as they are
pub fn percent_decode(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_partition_values() {
        let root = ObjectPath::from("data/table");
        let file = ObjectPath::from("data/table/region=US/year=2024/part-0.parquet");
        assert_eq!(
            partition_values(&root, &file),
            vec![
                ("region".to_string(), Some("US".to_string())),
                ("year".to_string(), Some("2024".to_string())),
            ]
        );
    }

    #[test]
    fn test_partition_values_ignores_plain_dirs_and_file_name() {
        let root = ObjectPath::from("data");
        let file = ObjectPath::from("data/batch1/k=v/a=b.parquet");
        assert_eq!(
            partition_values(&root, &file),
            vec![("k".to_string(), Some("v".to_string()))]
        );
    }

    #[test]
    fn test_hive_default_partition_is_null() {
        let root = ObjectPath::from("t");
        let file = ObjectPath::from(format!("t/chromosome={HIVE_DEFAULT_PARTITION}/p.parquet"));
        assert_eq!(
            partition_values(&root, &file),
            vec![("chromosome".to_string(), None)]
        );
    }

    #[test]
    fn test_partition_values_are_percent_decoded() {
        let root = ObjectPath::from("t");
        for (dir, expected) in [("k=a%3Ab", "a:b"), ("k=100%25", "100%")] {
            let file = ObjectPath::parse(format!("t/{dir}/p.parquet")).unwrap();
            assert_eq!(
                partition_values(&root, &file),
                vec![("k".to_string(), Some(expected.to_string()))]
            );
        }
    }

    #[test]
    fn test_file_outside_root() {
        let root = ObjectPath::from("a");
        let file = ObjectPath::from("b/k=v/p.parquet");
        assert!(partition_values(&root, &file).is_empty());
    }

    #[test_case("plain", "plain" ; "no escapes")]
    #[test_case("a%20b", "a b" ; "space")]
    #[test_case("x%3Dy", "x=y" ; "equals")]
    #[test_case("bad%zz", "bad%zz" ; "malformed")]
    #[test_case("tail%2", "tail%2" ; "truncated")]
    #[test_case("a%3Ab", "a:b" ; "colon")]
    #[test_case("100%25", "100%" ; "escaped percent")]
    #[test_case("caf%C3%A9", "café" ; "multibyte")]
    fn test_percent_decode(input: &str, expected: &str) {
        assert_eq!(percent_decode(input), expected);
    }
}
