// ABOUTME: Shared logging setup for lingo binaries
// ABOUTME: init() logs to stderr for CLI commands, init_file() logs to a file for the TUI

use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::filter::Builder;
use tracing_subscriber::EnvFilter;

/// Stderr logging for one-shot commands. Default: INFO level, RUST_LOG override.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(filter_builder(Level::INFO).from_env_lossy())
        .with_writer(std::io::stderr)
        .init();
}

/// File-based logging for the TUI. Default: WARN level, RUST_LOG override.
/// Logs to <config dir>/lingo/{app_name}.log so output never lands on the terminal.
/// If setup fails, prints a warning to stderr and continues without logging.
pub fn init_file(app_name: &str) {
    let Some(config_dir) = dirs::config_dir() else {
        eprintln!("Warning: failed to set up file logging: could not determine config directory");
        return;
    };
    if let Err(e) = init_file_in(&config_dir.join("lingo"), app_name) {
        eprintln!("Warning: failed to set up file logging: {e}");
    }
}

/// Path of the log file `init_file` writes to inside `log_dir`.
pub fn log_file_path(log_dir: &Path, app_name: &str) -> PathBuf {
    log_dir.join(format!("{app_name}.log"))
}

/// `default` applies only when RUST_LOG is unset or empty.
fn filter_builder(default: Level) -> Builder {
    EnvFilter::builder().with_default_directive(default.into())
}

fn init_file_in(
    log_dir: &Path,
    app_name: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let log_file = open_log_file(log_dir, app_name)?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(filter_builder(Level::WARN).from_env_lossy())
        .with_ansi(false)
        .try_init()?;

    Ok(())
}

fn open_log_file(log_dir: &Path, app_name: &str) -> std::io::Result<std::fs::File> {
    std::fs::create_dir_all(log_dir)?;
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path(log_dir, app_name))
}
