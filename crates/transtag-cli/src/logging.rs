//! Global `tracing` subscriber setup.

use crate::error::{CliError, CliResult};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use transtag_config::LoggingConfig;

/// File name prefix of the daily rolling log.
pub const LOG_FILE_PREFIX: &str = "transtag.log";

/// Builds the level filter: `RUST_LOG` when set, else the configured filter.
pub fn build_filter(config: &LoggingConfig) -> CliResult<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| CliError::Logging(format!("invalid filter '{}': {e}", config.filter)))
}

/// Installs the global subscriber.
///
/// Logs go to stderr, or to a daily rolling file below
/// `logging.directory` when one is configured. The returned guard flushes
/// the file writer and must be held until the program exits.
pub fn init_logging(config: &LoggingConfig) -> CliResult<Option<WorkerGuard>> {
    let filter = build_filter(config)?;

    match &config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .try_init()
                .map_err(|e| CliError::Logging(e.to_string()))?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init()
                .map_err(|e| CliError::Logging(e.to_string()))?;
            Ok(None)
        }
    }
}
