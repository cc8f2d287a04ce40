//! Tracing setup.
//!
//! The terminal is the UI, so nothing is ever logged to stdout or stderr. When
//! `ZMENU_LOG_DIR` is set, events go to `<dir>/<app>.<pid>.log`, filtered by
//! `RUST_LOG` (default `zmenu=debug,info`). Otherwise no subscriber is
//! installed and `tracing` macros cost nothing.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;

const DEFAULT_FILTER: &str = "zmenu=debug,info";

/// Install the file subscriber if a log directory is configured. Returns the
/// log file path when logging is active.
pub fn init(config: &EnvConfig, app: &str) -> Option<PathBuf> {
    let dir = config.log_dir.as_deref()?;
    let path = init_in(dir, app).ok()?;
    tracing::info!(path = %path.display(), "tracing initialized");
    Some(path)
}

fn init_in(dir: &Path, app: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = log_file_path(dir, app);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(std::io::Error::other)?;
    Ok(path)
}

pub fn log_file_path(dir: &Path, app: &str) -> PathBuf {
    dir.join(format!("{app}.{}.log", std::process::id()))
}
