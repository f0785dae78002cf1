//! Dataset file discovery

use super::hive::partition_values;
use super::location::StorageLocation;
use crate::error::{Error, Result};
use futures::TryStreamExt;
use object_store::path::Path as ObjectPath;
use object_store::ObjectMeta;
use tracing::debug;

/// File names that carry a dataset-wide Parquet footer instead of rows
pub const METADATA_FILE_NAMES: [&str; 2] = ["_common_metadata", "_metadata"];

/// One Parquet file of a dataset
#[derive(Debug, Clone)]
pub struct DataFile {
    /// Object store metadata (path and size)
    pub meta: ObjectMeta,
    /// Hive partition values, outermost directory first
    pub partitions: Vec<(String, Option<String>)>,
}

/// The files making up a dataset, in read order
#[derive(Debug, Clone)]
pub struct Dataset {
    location: StorageLocation,
    files: Vec<DataFile>,
    metadata_files: Vec<ObjectMeta>,
}

impl Dataset {
    /// List the data files under a location.
    ///
    /// A location naming a single object is a one-file dataset. Otherwise
    /// every object below it is considered, skipping anything whose path
    /// relative to the root has a segment starting with `_` or `.`. Files are
    /// sorted by path so the read order does not depend on listing order.
    pub async fn discover(location: StorageLocation) -> Result<Self> {
        let store = location.store();
        let root = location.path();

        match store.head(root).await {
            Ok(meta) => {
                debug!("Reading single file {}", location.display_path(&meta.location));
                return Ok(Self {
                    files: vec![DataFile {
                        meta,
                        partitions: Vec::new(),
                    }],
                    metadata_files: Vec::new(),
                    location,
                });
            }
            Err(object_store::Error::NotFound { .. }) => {}
            Err(e) => return Err(Error::read(location.to_string(), e)),
        }

        let mut objects: Vec<ObjectMeta> = store
            .list(Some(root))
            .try_collect()
            .await
            .map_err(|e| Error::read(location.to_string(), e))?;
        objects.sort_by(|a, b| a.location.cmp(&b.location));

        let mut files = Vec::new();
        let mut metadata_files = Vec::new();
        for meta in objects {
            if let Some(name) = meta.location.filename() {
                if METADATA_FILE_NAMES.contains(&name) && is_directly_under(root, &meta.location) {
                    metadata_files.push(meta);
                    continue;
                }
            }
            if is_hidden(root, &meta.location) {
                continue;
            }
            let partitions = partition_values(root, &meta.location);
            files.push(DataFile { meta, partitions });
        }

        if files.is_empty() {
            return Err(Error::read(location.to_string(), "no data files found"));
        }

        debug!(
            "Found {} data files ({} metadata files) under {location}",
            files.len(),
            metadata_files.len()
        );

        Ok(Self {
            location,
            files,
            metadata_files,
        })
    }

    /// Where the dataset lives
    pub fn location(&self) -> &StorageLocation {
        &self.location
    }

    /// Data files in read order
    pub fn files(&self) -> &[DataFile] {
        &self.files
    }

    /// Sidecar `_common_metadata` / `_metadata` files, `_common_metadata` first
    pub fn metadata_files(&self) -> &[ObjectMeta] {
        &self.metadata_files
    }

    /// Partition keys across all files, in order of first appearance
    pub fn partition_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for file in &self.files {
            for (key, _) in &file.partitions {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }
        keys
    }

    /// User-facing rendering of a file path
    pub fn display_path(&self, path: &ObjectPath) -> String {
        self.location.display_path(path)
    }
}

fn relative_segments(root: &ObjectPath, path: &ObjectPath) -> Vec<String> {
    path.prefix_match(root)
        .map(|parts| parts.map(|part| part.as_ref().to_string()).collect())
        .unwrap_or_default()
}

fn is_hidden(root: &ObjectPath, path: &ObjectPath) -> bool {
    relative_segments(root, path)
        .iter()
        .any(|segment| segment.starts_with('_') || segment.starts_with('.'))
}

fn is_directly_under(root: &ObjectPath, path: &ObjectPath) -> bool {
    relative_segments(root, path).len() == 1
}
