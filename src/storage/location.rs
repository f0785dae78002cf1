//! Source location parsing and object store construction

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use object_store::aws::{AmazonS3Builder, AmazonS3ConfigKey};
use object_store::azure::{AzureConfigKey, MicrosoftAzureBuilder};
use object_store::gcp::{GoogleCloudStorageBuilder, GoogleConfigKey};
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use url::Url;

/// A resolved dataset location: which store, and where inside it
#[derive(Clone)]
pub struct StorageLocation {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Dataset path within the store
    path: ObjectPath,
    /// Scheme plus bucket/container, used to render full paths in messages
    root: String,
    /// Original URL scheme for logging
    scheme: String,
}

impl fmt::Debug for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageLocation")
            .field("store", &self.store.to_string())
            .field("path", &self.path)
            .field("root", &self.root)
            .field("scheme", &self.scheme)
            .finish()
    }
}

impl StorageLocation {
    /// Wrap an existing store.
    ///
    /// `root` prefixes object paths in messages, e.g. `s3://bucket`.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        path: ObjectPath,
        root: impl Into<String>,
        scheme: impl Into<String>,
    ) -> Self {
        Self {
            store,
            path,
            root: root.into(),
            scheme: scheme.into(),
        }
    }

    /// Resolve a path or URI into a store handle.
    ///
    /// Local paths must exist. Remote locations are not contacted here, a
    /// missing bucket or prefix shows up when the dataset is listed.
    pub fn resolve(uri: &str, config: &StorageConfig) -> Result<Self> {
        let Some((scheme, _)) = uri.split_once("://") else {
            return Self::resolve_local(uri, Path::new(uri));
        };

        let url = Url::parse(uri).map_err(|e| Error::location(uri, e))?;
        match scheme.to_ascii_lowercase().as_str() {
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|()| Error::location(uri, "not a valid file URI"))?;
                Self::resolve_local(uri, &path)
            }
            "s3" | "s3a" => Self::resolve_s3(uri, &url, config, false),
            "r2" => Self::resolve_s3(uri, &url, config, true),
            "gs" | "gcs" => Self::resolve_gcs(uri, &url, config),
            "az" | "azure" | "abfs" | "abfss" => Self::resolve_azure(uri, &url, config),
            other => Err(Error::location(
                uri,
                format!("unsupported storage scheme '{other}'"),
            )),
        }
    }

    /// Resolve a local filesystem path
    fn resolve_local(uri: &str, path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::location(uri, "no such file or directory"));
        }

        let object_path =
            ObjectPath::from_filesystem_path(path).map_err(|e| Error::location(uri, e))?;

        Ok(Self::new(
            Arc::new(LocalFileSystem::new()),
            object_path,
            "",
            "file",
        ))
    }

    /// Resolve S3 or R2 URL
    fn resolve_s3(uri: &str, url: &Url, config: &StorageConfig, is_r2: bool) -> Result<Self> {
        let scheme = if is_r2 { "r2" } else { "s3" };
        let bucket = bucket_name(uri, url)?;

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);

        // R2 endpoint: https://<account_id>.r2.cloudflarestorage.com
        if is_r2 {
            if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                builder = builder.with_endpoint(endpoint);
            }
        }

        for (key, value) in &config.options {
            let key: AmazonS3ConfigKey = key
                .parse()
                .map_err(|e| Error::location(uri, format!("unknown S3 option '{key}': {e}")))?;
            builder = builder.with_config(key, value);
        }

        let store = builder
            .build()
            .map_err(|e| Error::location(uri, format!("failed to create {scheme} client: {e}")))?;

        Ok(Self::new(
            Arc::new(store),
            object_path(uri, url)?,
            format!("{scheme}://{bucket}"),
            scheme,
        ))
    }

    /// Resolve GCS URL
    fn resolve_gcs(uri: &str, url: &Url, config: &StorageConfig) -> Result<Self> {
        let bucket = bucket_name(uri, url)?;

        let mut builder = GoogleCloudStorageBuilder::from_env().with_bucket_name(bucket);
        for (key, value) in &config.options {
            let key: GoogleConfigKey = key
                .parse()
                .map_err(|e| Error::location(uri, format!("unknown GCS option '{key}': {e}")))?;
            builder = builder.with_config(key, value);
        }

        let store = builder
            .build()
            .map_err(|e| Error::location(uri, format!("failed to create GCS client: {e}")))?;

        Ok(Self::new(
            Arc::new(store),
            object_path(uri, url)?,
            format!("gs://{bucket}"),
            "gs",
        ))
    }

    /// Resolve Azure Blob URL.
    ///
    /// `abfs[s]://container@account.dfs.core.windows.net/path` carries the
    /// account in the host; `az://container/path` takes it from the
    /// environment or the storage options.
    fn resolve_azure(uri: &str, url: &Url, config: &StorageConfig) -> Result<Self> {
        let host = bucket_name(uri, url)?;
        let (container, account) = if url.username().is_empty() {
            (host, None)
        } else {
            (url.username(), host.split('.').next())
        };

        let mut builder = MicrosoftAzureBuilder::from_env().with_container_name(container);
        if let Some(account) = account {
            builder = builder.with_account(account);
        }
        for (key, value) in &config.options {
            let key: AzureConfigKey = key
                .parse()
                .map_err(|e| Error::location(uri, format!("unknown Azure option '{key}': {e}")))?;
            builder = builder.with_config(key, value);
        }

        let store = builder
            .build()
            .map_err(|e| Error::location(uri, format!("failed to create Azure client: {e}")))?;

        Ok(Self::new(
            Arc::new(store),
            object_path(uri, url)?,
            format!("az://{container}"),
            "az",
        ))
    }

    /// The object store handle
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Dataset path inside the store
    pub fn path(&self) -> &ObjectPath {
        &self.path
    }

    /// Get the scheme (file, s3, r2, gs, az, memory)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Check if this is a remote location
    pub fn is_remote(&self) -> bool {
        !matches!(self.scheme.as_str(), "file" | "memory")
    }

    /// Render a path in this store the way a user would type it
    pub fn display_path(&self, path: &ObjectPath) -> String {
        format!("{}/{path}", self.root)
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.root, self.path)
    }
}

/// Bucket or container named by the URL host
fn bucket_name<'a>(uri: &str, url: &'a Url) -> Result<&'a str> {
    url.host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| Error::location(uri, "missing bucket name"))
}

/// Object path named by the URL path, percent-decoded
fn object_path(uri: &str, url: &Url) -> Result<ObjectPath> {
    ObjectPath::from_url_path(url.path()).map_err(|e| Error::location(uri, e))
}
