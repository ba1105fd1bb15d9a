//! File logging.
//!
//! The terminal is owned by the table view, so nothing is logged to the console. Logs go to
//! `<config dir>/csvpad/logs/csvpad.log` with daily rotation.
//!
//! Configure via the `CSVPAD_LOG` environment variable (same syntax as `RUST_LOG`):
//! - `CSVPAD_LOG=debug` - every grid change and dialog answer
//! - `CSVPAD_LOG=csvpad::config=debug` - module-level filtering

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const ENV_VAR: &str = "CSVPAD_LOG";
const FILE_NAME: &str = "csvpad.log";

fn ensure_logs_dir() -> Result<PathBuf> {
    let dir = crate::utils::app_config_dir()
        .context("no config directory on this platform")?
        .join("logs");
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir)
}

/// Install the global subscriber. Logging problems are reported on stderr and never fatal.
pub fn init() {
    let filter = EnvFilter::try_from_env(ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, FILE_NAME);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(filter),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {e:#}");
            None
        }
    };

    tracing_subscriber::registry().with(file_layer).init();
}
