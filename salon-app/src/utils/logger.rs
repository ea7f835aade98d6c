//! Logging Infrastructure
//!
//! Console output plus optional daily rotating files under `{log_dir}/app`.
//! `RUST_LOG` overrides the configured level.

use std::fs;
use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logger with console output only
pub fn init_logger(level: &str) -> anyhow::Result<()> {
    init_logger_with_file(level, false, None)
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn")
/// * `json_format` - JSON lines instead of the human readable format
/// * `log_dir` - Optional directory for daily rotated log files
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let file_appender = match log_dir {
        Some(dir) => Some(app_appender(Path::new(dir))?),
        None => None,
    };

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(env_filter(level))
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_filter(env_filter(level))
            .boxed()
    };

    let file_layer = file_appender.map(|appender| {
        let writer = std::sync::Mutex::new(appender);
        if json_format {
            fmt::layer()
                .json()
                .with_target(true)
                .with_writer(writer)
                .with_filter(env_filter(level))
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(env_filter(level))
                .boxed()
        }
    });

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()?;
    Ok(())
}

/// Daily rotating appender writing `{log_dir}/app/app.YYYY-MM-DD`
pub fn app_appender(log_dir: &Path) -> anyhow::Result<RollingFileAppender> {
    let app_log_dir = log_dir.join("app");
    fs::create_dir_all(&app_log_dir)?;
    Ok(RollingFileAppender::new(Rotation::DAILY, app_log_dir, "app"))
}
