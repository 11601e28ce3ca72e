//! Log setup for the binary.
//!
//! Filtering follows `GRIDPAD_LOG`, then `RUST_LOG`, defaulting to `info`:
//! - `GRIDPAD_LOG=debug` - every mutation and history move
//! - `GRIDPAD_LOG=gridpad_core=debug` - core only
//!
//! The TUI owns the terminal, so interactive sessions log to a daily rolling file in the
//! data dir (e.g. `~/.local/share/gridpad/logs/gridpad.log.YYYY-MM-DD`). Headless export
//! logs to stderr.

use directories::ProjectDirs;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("GRIDPAD_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn logs_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gridpad").map(|dirs| dirs.data_dir().join("logs"))
}

/// Log to the rolling file. Returns the directory, or `None` when no usable dir exists
/// (logging is then disabled rather than written over the TUI).
pub fn init_file_logging() -> Option<PathBuf> {
    let dir = logs_dir()?;
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Warning: Could not initialize file logging: {}", e);
        return None;
    }
    let file_appender = tracing_appender::rolling::daily(&dir, "gridpad.log");
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true),
        )
        .init();
    Some(dir)
}

pub fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
