use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

fn log_dir() -> Option<PathBuf> {
    let base = BaseDirs::new()?;
    Some(base.data_dir().join("codechat").join("logs"))
}

/// File logging only; the terminal belongs to the UI. Keep the guard alive
/// until exit so buffered lines are flushed.
pub fn init() -> Result<Option<WorkerGuard>> {
    let Some(dir) = log_dir() else {
        return Ok(None);
    };
    fs::create_dir_all(&dir).with_context(|| format!("create log dir: {}", dir.display()))?;
    let appender = tracing_appender::rolling::daily(&dir, "codechat.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("init tracing: {e}"))?;
    info!(
        target: "tui",
        version = env!("CARGO_PKG_VERSION"),
        log_dir = %dir.display(),
        "codechat starting"
    );
    Ok(Some(guard))
}
