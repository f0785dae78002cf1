//! CLI runner - executes a conversion

use crate::cli::commands::Cli;
use crate::config::{ConvertConfig, StorageConfig};
use crate::convert::{ConversionSummary, Converter};
use crate::error::Result;
use crate::output::Sink;
use std::future;
use tokio::signal;
use tracing::warn;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the conversion until it completes or the process is signalled
    pub async fn run(&self) -> Result<ConversionSummary> {
        let config = self.config()?;
        let sink = Sink::from_destination(self.cli.destination.as_deref());

        Converter::new(config)
            .convert_until(&self.cli.source, &sink, shutdown_signal())
            .await
    }

    /// Build the configuration: file values first, then flags
    pub fn config(&self) -> Result<ConvertConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ConvertConfig::from_file(path)?,
            None => ConvertConfig::default(),
        };

        if let Some(batch_size) = self.cli.batch_size {
            config.batch_size = batch_size;
        }

        let fixups = &mut config.schema;
        for column in &self.cli.string_columns {
            if !fixups.string_columns.contains(column) {
                fixups.string_columns.push(column.clone());
            }
        }
        for column in &self.cli.drop_columns {
            if !fixups.drop_columns.contains(column) {
                fixups.drop_columns.push(column.clone());
            }
        }

        for pair in &self.cli.storage_options {
            let (key, value) = StorageConfig::parse_option(pair)?;
            config.storage.options.insert(key, value);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = future::pending::<()>();

    tokio::select! {
        () = ctrl_c => warn!("Received Ctrl+C, stopping conversion"),
        () = terminate => warn!("Received SIGTERM, stopping conversion"),
    }
}
