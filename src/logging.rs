use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{Result, TrackerError};

/// Initializes the logging system with both console and file output.
///
/// Console output goes to stderr so that stdout stays free for the JSON
/// records. The returned guard flushes the file writer when dropped and
/// must be held for the life of the program. Fails without installing a
/// subscriber when the log directory cannot be created.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    // Ensure logs directory exists
    fs::create_dir_all(&config.directory).map_err(|e| {
        TrackerError::Config(format!(
            "Failed to create log directory '{}': {}",
            config.directory, e
        ))
    })?;

    // Create a non-blocking file appender for daily log rotation
    let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_name);
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    // Create a JSON layer for file logging
    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    // Create a formatted layer for console logging
    let console_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    // Respect RUST_LOG if set; otherwise use the configured default
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(guard)
}
