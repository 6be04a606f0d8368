//! Logging configuration using tracing
//!
//! The terminal belongs to the UI, so logs go to a daily rolling file.

use std::path::{Path, PathBuf};

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "TCPTERM_LOG";

/// Log file name prefix inside the log directory.
pub const LOG_FILE: &str = "tcpterm.log";

/// Default log directory: `tcpterm` under the system temp directory.
pub fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join("tcpterm")
}

/// Initialize the logging subsystem.
///
/// The filter comes from `TCPTERM_LOG` if set, else from `level`. Keep the
/// returned guard alive for the life of the program; dropping it flushes
/// buffered log lines.
///
/// # Examples
/// ```bash
/// TCPTERM_LOG=debug tcpterm
/// TCPTERM_LOG=tcpterm_app=trace,warn tcpterm
/// ```
pub fn init(log_dir: &Path, level: &str) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(log_dir)?;

    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(true))
        .try_init()?;

    tracing::info!(log_dir = %log_dir.display(), "tcpterm starting");
    Ok(guard)
}
