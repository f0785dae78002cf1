//! Conversion configuration
//!
//! Everything a conversion needs besides its source and destination lives in
//! [`ConvertConfig`]. It can be built in code, loaded from YAML, or assembled
//! by the CLI from flags.
//!
//! ```yaml
//! batch_size: 4096
//! schema:
//!   string_columns: [chromosome]
//!   drop_columns: [legacy_score]
//! storage:
//!   options:
//!     aws_region: eu-west-1
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Rows per decoded Arrow batch
pub const DEFAULT_BATCH_SIZE: usize = 1024;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Configuration for a single conversion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Maximum number of rows decoded from a row group at a time
    pub batch_size: usize,

    /// Column-level schema fixups
    pub schema: SchemaFixups,

    /// Storage backend options
    pub storage: StorageConfig,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            schema: SchemaFixups::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl ConvertConfig {
    /// Load a config from a YAML file.
    ///
    /// Values are not validated, so later overrides can still fix them; call
    /// [`validate`](Self::validate) once the config is final.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse a config from a YAML string, without validating it
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::config("batch_size must be greater than zero"));
        }
        Ok(())
    }

    /// Set the batch size
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Replace the schema fixups
    #[must_use]
    pub fn with_fixups(mut self, fixups: SchemaFixups) -> Self {
        self.schema = fixups;
        self
    }

    /// Replace the storage options
    #[must_use]
    pub fn with_storage(mut self, storage: StorageConfig) -> Self {
        self.storage = storage;
        self
    }
}

// ============================================================================
// Schema Fixups
// ============================================================================

/// Named column fixups applied to the reconciled schema, in field order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaFixups {
    /// Columns forced to strings when they read back as anything else.
    ///
    /// Partition values such as chromosome names ("1", "2", "X") look numeric
    /// in some partitions and not in others.
    pub string_columns: Vec<String>,

    /// Columns removed from the schema when present
    pub drop_columns: Vec<String>,
}

impl Default for SchemaFixups {
    fn default() -> Self {
        Self {
            string_columns: vec!["chromosome".to_string()],
            drop_columns: Vec::new(),
        }
    }
}

impl SchemaFixups {
    /// Fixups that change nothing
    pub fn none() -> Self {
        Self {
            string_columns: Vec::new(),
            drop_columns: Vec::new(),
        }
    }

    /// Add a column to force to string
    #[must_use]
    pub fn with_string_column(mut self, name: impl Into<String>) -> Self {
        self.string_columns.push(name.into());
        self
    }

    /// Add a column to drop
    #[must_use]
    pub fn with_drop_column(mut self, name: impl Into<String>) -> Self {
        self.drop_columns.push(name.into());
        self
    }
}

// ============================================================================
// Storage
// ============================================================================

/// Options handed to the object store builders.
///
/// Keys use the object_store config key names (`aws_region`,
/// `aws_endpoint`, `google_service_account`, `azure_storage_account_name`,
/// ...). Environment variables are read first; these override them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Config key to value
    pub options: BTreeMap<String, String>,
}

impl StorageConfig {
    /// Add an option
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Parse a `KEY=VALUE` pair
    pub fn parse_option(pair: &str) -> Result<(String, String)> {
        match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(Error::config(format!(
                "Invalid storage option '{pair}', expected KEY=VALUE"
            ))),
        }
    }
}
