//! Logging system initialization
//!
//! The terminal belongs to the UI, so everything goes to a log file through
//! a non-blocking writer.

use std::error::Error;
use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Installs the global subscriber. Keep the returned guard alive until exit
/// so buffered lines are flushed.
pub fn init_logging(config: &AppConfig) -> Result<WorkerGuard, Box<dyn Error>> {
    let log_file = config.log_file();
    let dir = log_file.parent().unwrap_or(Path::new("."));
    let filename = log_file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("phim_tui.log");

    fs::create_dir_all(dir)?;
    let appender = rolling::never(dir, filename);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_level(true)
        .with_thread_names(true)
        .try_init()
        .map_err(|e| e.to_string())?;

    Ok(guard)
}
