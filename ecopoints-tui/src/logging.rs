//! File logging for the terminal UI.
//!
//! The terminal belongs to the UI, so log output goes to `<log_dir>/ecopoints.log`.
//! `RUST_LOG` overrides the default `info` filter.

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE: &str = "ecopoints.log";

/// Install the global subscriber.
///
/// The returned guard flushes the file writer when dropped and must live as
/// long as logging is wanted.
pub(crate) fn init_logging(log_dir: &Path) -> Result<WorkerGuard, io::Error> {
    fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(guard)
}
