//! Structured Logging
//!
//! JSON events written to a daily rolling file, since the terminal belongs
//! to the TUI. Files older than the retention period are removed on startup.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, Local};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log retention period in days
pub const LOG_RETENTION_DAYS: i64 = 30;

const DEFAULT_FILTER: &str = "zwicky=info,warn";

/// Initialize the logging system.
///
/// Returns a guard that must be kept alive for buffered events to reach
/// the file.
pub fn init(log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    fs::create_dir_all(log_dir)?;

    let removed = cleanup_old_logs(log_dir, LOG_RETENTION_DAYS);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("zwicky")
        .filename_suffix("log")
        .build(log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .json()
                .with_current_span(true)
                .with_file(true)
                .with_line_number(true)
                .flatten_event(true),
        )
        .try_init()?;

    tracing::info!(
        event = "logging_initialized",
        log_dir = %log_dir.display(),
        retention_days = LOG_RETENTION_DAYS,
        removed,
        "Logging system initialized"
    );

    Ok(guard)
}

/// Default log directory: `<data_dir>/zwicky/logs`
pub fn default_log_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("zwicky")
        .join("logs")
}

/// Remove `.log` files not modified within `retention_days`.
///
/// Returns the number of files removed.
pub fn cleanup_old_logs(log_dir: &Path, retention_days: i64) -> usize {
    let cutoff = Local::now() - Duration::days(retention_days);

    let Ok(entries) = fs::read_dir(log_dir) else {
        return 0;
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_none_or(|e| e != "log") {
            continue;
        }

        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        let modified: chrono::DateTime<Local> = modified.into();

        if modified < cutoff && fs::remove_file(&path).is_ok() {
            removed += 1;
        }
    }
    removed
}
