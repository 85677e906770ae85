//! Logging setup for the tabkit binary.
//!
//! Console output always goes to stderr so that commands which print data
//! (e.g. `tabkit aggregate` without `--output`) keep stdout clean. When file
//! logging is requested, two daily-rotating files are added:
//!
//! - `tabkit.<date>.log`: all levels allowed by the env filter
//! - `error.<date>.log`: warnings and errors only
//!
//! ```no_run
//! tabkit::logging::init(None).expect("Failed to initialize logging");
//! tracing::info!("ready");
//! ```

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// Gets the default log directory based on platform conventions
///
/// - Windows: `%APPDATA%/tabkit/logs`
/// - macOS: `~/Library/Application Support/tabkit/logs`
/// - Linux: `~/.local/share/tabkit/logs`
pub fn default_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    Ok(base_dir.join("tabkit").join("logs"))
}

/// Initializes the global subscriber.
///
/// `log_dir` enables the rotating file appenders in that directory
/// (created if missing). The level defaults to INFO and can be overridden
/// with `RUST_LOG`.
///
/// # Errors
///
/// Returns error if the log directory cannot be created, an appender fails
/// to build, or a global subscriber is already installed.
pub fn init(log_dir: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let (all_logs_layer, error_logs_layer) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

            let all_logs_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(10)
                .filename_prefix("tabkit")
                .filename_suffix("log")
                .build(dir)
                .context("Failed to create all-logs file appender")?;

            let error_logs_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(10)
                .filename_prefix("error")
                .filename_suffix("log")
                .build(dir)
                .context("Failed to create error-logs file appender")?;

            let all_logs = fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .with_ansi(false)
                .with_writer(all_logs_appender);

            let error_logs = fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .with_ansi(false)
                .with_writer(error_logs_appender)
                .with_filter(EnvFilter::new("warn"));

            (Some(all_logs), Some(error_logs))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(all_logs_layer)
        .with(error_logs_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(dir) = log_dir {
        tracing::debug!("File logging enabled in {}", dir.display());
    }

    Ok(())
}
