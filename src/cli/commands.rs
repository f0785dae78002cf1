//! CLI arguments

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Convert Parquet datasets to newline-delimited JSON
#[derive(Parser, Debug)]
#[command(name = "parquet2json")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Dataset to read: a local path or a URL
    /// Supports: /path, file://, s3://, r2://, gs://, az://, abfss://
    pub source: String,

    /// Output file, stdout when omitted or `-`
    pub destination: Option<String>,

    /// Configuration file (YAML)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Rows decoded per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Column forced to string type (repeatable)
    #[arg(long = "string-column", value_name = "COLUMN")]
    pub string_columns: Vec<String>,

    /// Column removed from the output (repeatable)
    #[arg(long = "drop-column", value_name = "COLUMN")]
    pub drop_columns: Vec<String>,

    /// Object store option as KEY=VALUE (repeatable)
    #[arg(long = "storage-option", value_name = "KEY=VALUE")]
    pub storage_options: Vec<String>,

    /// Log level
    #[arg(long, default_value = "warn")]
    pub log_level: LogLevel,

    /// Verbose output (same as --log-level debug)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Effective log level
    pub fn level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else {
            self.log_level.into()
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Everything, including per-batch detail
    Trace,
    /// Stage progress and the reconciled schema
    Debug,
    /// Conversion summary
    Info,
    /// Schema fallbacks and signals
    Warn,
    /// Errors only
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}
