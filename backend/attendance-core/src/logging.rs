// src/logging.rs
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("File I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
    #[error("Log file could not be opened: {0}")]
    Appender(#[from] InitError),
    #[error("Setting tracing subscriber failed: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Installed logging. Keep it alive until the run ends or buffered file
/// lines are lost.
pub struct LoggingSetup {
    _guard: Option<WorkerGuard>,
    /// Where the file layer writes, or why stdout is the only output.
    pub log_file: Result<PathBuf, LoggingError>,
}

/// `attendance_etl_<processed day>_<wall clock time>.log`
pub fn log_file_name(date: NaiveDate, started_at: NaiveDateTime) -> String {
    format!(
        "attendance_etl_{}_{}.log",
        date.format("%Y%m%d"),
        started_at.format("%H%M%S")
    )
}

/// Creates `logs_dir` and opens this run's log file behind a non-blocking
/// writer.
pub fn open_log_file(
    logs_dir: &Path,
    date: NaiveDate,
    started_at: NaiveDateTime,
) -> Result<(NonBlocking, WorkerGuard, PathBuf), LoggingError> {
    fs::create_dir_all(logs_dir).map_err(|e| LoggingError::Io {
        source: e,
        context: format!("creating {}", logs_dir.display()),
    })?;

    let file_name = log_file_name(date, started_at);
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(&file_name)
        .build(logs_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    Ok((non_blocking, guard, logs_dir.join(file_name)))
}

/// Installs the global subscriber: stdout plus a plain-text file in
/// `logs_dir`. When the file cannot be opened the run logs to stdout only
/// and the reason is kept in [`LoggingSetup::log_file`]. Fails only if a
/// global subscriber is already set.
pub fn init_logging(
    logs_dir: &Path,
    date: NaiveDate,
    started_at: NaiveDateTime,
) -> Result<LoggingSetup, LoggingError> {
    let (file_layer, guard, log_file) = match open_log_file(logs_dir, date, started_at) {
        Ok((non_blocking, guard, path)) => {
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard), Ok(path))
        }
        Err(e) => (None, None, Err(e)),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .try_init()?;

    Ok(LoggingSetup {
        _guard: guard,
        log_file,
    })
}
