//! File-backed structured logging.
//!
//! The UI owns the terminal (raw mode, alternate screen), so diagnostics go
//! to a log file instead of stderr. The filter comes from the
//! `CAMPUS_ADMIN_LOG` environment variable with an `info` default.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable controlling the tracing filter.
pub const LOG_FILTER_ENV: &str = "CAMPUS_ADMIN_LOG";

/// Install the global tracing subscriber writing to `log_file`.
pub fn init(log_file: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
