// Logging - tracing subscriber setup for the binaries
//
// Command-line and server runs log to stderr. The TUI owns the terminal, so
// it logs to a file instead and keeps the writer guard alive for the session.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "roster.log";

/// Filter for a `-v` count. `RUST_LOG` overrides it when set.
pub fn env_filter(verbose: u8) -> EnvFilter {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr
pub fn init_stderr(verbose: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log to `<log_dir>/roster.log`. Drop the returned guard only at exit, or
/// buffered lines are lost.
pub fn init_file(log_dir: &Path, verbose: u8) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    // At least `info` in the file: nobody is watching it live
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose.max(1)))
        .with_ansi(false)
        .with_writer(writer)
        .try_init();

    tracing::info!(log_file = %log_dir.join(LOG_FILE_NAME).display(), "logging initialized");
    Ok(guard)
}
