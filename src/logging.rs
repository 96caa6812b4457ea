//! File-backed tracing setup. The terminal belongs to the UI, so nothing is
//! ever written to stdout or stderr once the subscriber is installed.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::{AppError, Result};

/// Open (append) the log file at `path`.
fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::from_io(e, path))
}

/// Build the filter: `RUST_LOG` when set, otherwise `default_level`.
fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber writing plain-text records to `path`.
pub fn init(path: &Path, default_level: &str) -> Result<()> {
    let file = open_log_file(path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .with(build_filter(default_level))
        .try_init()
        .map_err(|e| AppError::Terminal(format!("logging init failed: {}", e)))
}
