//! Tracing initialization

use std::path::Path;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding per-module log directives
pub const LOG_ENV: &str = "TAG_CURATOR_LOG";

const DEFAULT_FILTER: &str = "tag_curator=info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Failed to install subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Pick the filter directives: explicit level first, then `TAG_CURATOR_LOG`, then the default
fn filter_directives(level: Option<&str>, env_value: Option<String>) -> String {
    match level {
        Some(level) => format!("tag_curator={}", level),
        None => env_value
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string()),
    }
}

/// Install a subscriber writing to `log_path`.
///
/// The returned guard flushes buffered lines on drop and must be held until exit.
pub fn init_logging(
    log_path: &Path,
    level: Option<&str>,
    json: bool,
) -> Result<WorkerGuard, LoggingError> {
    let directory = log_path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(directory)?;

    let file_name = log_path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "tag-curator.log".into());
    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_new(filter_directives(level, std::env::var(LOG_ENV).ok()))?;

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(writer).with_target(true))
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true),
            )
            .try_init()?;
    }

    Ok(guard)
}
