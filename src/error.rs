//! Error types for parquet2json
//!
//! Every stage of a conversion reports failures through the single [`Error`]
//! enum defined here. Each variant names the location, file or destination it
//! failed on, so the `Display` output is the message shown to the user.

use thiserror::Error;

/// The main error type for parquet2json
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Resolution Errors
    // ============================================================================
    /// Source location missing or scheme unsupported
    #[error("Invalid location '{location}': {message}")]
    Location {
        /// Location as given
        location: String,
        /// What went wrong
        message: String,
    },

    // ============================================================================
    // Schema Errors
    // ============================================================================
    /// No usable schema in metadata or sampled rows
    #[error("Failed to read schema of '{location}': {message}")]
    Schema {
        /// Dataset location
        location: String,
        /// Last failure seen
        message: String,
    },

    // ============================================================================
    // Read Errors
    // ============================================================================
    /// Dataset or file inaccessible
    #[error("Failed to read '{path}': {message}")]
    Read {
        /// Dataset or file path
        path: String,
        /// Underlying store error
        message: String,
    },

    /// File bytes are not valid Parquet, or do not fit the schema
    #[error("Invalid Parquet data in '{path}': {message}")]
    Format {
        /// File path
        path: String,
        /// Decode or cast error
        message: String,
    },

    // ============================================================================
    // Output Errors
    // ============================================================================
    /// Destination could not be opened or written
    #[error("Failed to write to {destination}: {message}")]
    Sink {
        /// Destination name
        destination: String,
        /// Underlying I/O error
        message: String,
    },

    /// Stopped by a shutdown signal; output so far is flushed
    #[error("Conversion interrupted after {rows_written} rows")]
    Interrupted {
        /// Lines written before stopping
        rows_written: u64,
    },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Invalid configuration value
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong
        message: String,
    },

    /// Config file is not valid YAML
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// [`Error::Location`]
    Location,
    /// [`Error::Schema`]
    Schema,
    /// [`Error::Read`]
    Read,
    /// [`Error::Format`]
    Format,
    /// [`Error::Sink`]
    Sink,
    /// [`Error::Interrupted`]
    Interrupted,
    /// [`Error::Config`] and [`Error::YamlParse`]
    Config,
}

impl Error {
    /// Create a location error
    pub fn location(location: impl Into<String>, message: impl ToString) -> Self {
        Self::Location {
            location: location.into(),
            message: message.to_string(),
        }
    }

    /// Create a schema error
    pub fn schema(location: impl Into<String>, message: impl ToString) -> Self {
        Self::Schema {
            location: location.into(),
            message: message.to_string(),
        }
    }

    /// Create a read error
    pub fn read(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Read {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a format error
    pub fn format(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Format {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a sink error
    pub fn sink(destination: impl Into<String>, message: impl ToString) -> Self {
        Self::Sink {
            destination: destination.into(),
            message: message.to_string(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Map a Parquet error raised while reading `path`.
    ///
    /// Parquet wraps object store failures as `External`; those are read
    /// errors, everything else means the bytes did not decode.
    pub fn from_parquet(path: impl Into<String>, err: parquet::errors::ParquetError) -> Self {
        match err {
            parquet::errors::ParquetError::External(inner) => Self::read(path, inner),
            other => Self::format(path, other),
        }
    }

    /// Which stage of the pipeline this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Location { .. } => ErrorKind::Location,
            Error::Schema { .. } => ErrorKind::Schema,
            Error::Read { .. } => ErrorKind::Read,
            Error::Format { .. } => ErrorKind::Format,
            Error::Sink { .. } => ErrorKind::Sink,
            Error::Interrupted { .. } => ErrorKind::Interrupted,
            Error::Config { .. } | Error::YamlParse(_) => ErrorKind::Config,
        }
    }
}

/// The error reported across the library boundary
pub type ConversionError = Error;

/// Result type alias for parquet2json
pub type Result<T> = std::result::Result<T, Error>;
