//! Logging setup with file rotation.

use crate::{OrchestratorError, OrchestratorResult};

use hp_config::LoggingConfig;

use std::panic::Location;
use std::path::Path;

use error_location::ErrorLocation;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

const MAX_LOG_FILES: usize = 7;

/// Setup logging with console and optional rotating file output.
///
/// # Log Layers
/// - Console: human-readable, colored per `logging.colored`
/// - File: daily rotation, 7 files retained, only when `logging.file` is set
///
/// `RUST_LOG` overrides the configured level.
pub fn setup_logging(config: &LoggingConfig, log_dir: &Path) -> OrchestratorResult<()> {
    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_ansi(config.colored);

    let file_layer = match &config.file {
        Some(prefix) => {
            std::fs::create_dir_all(log_dir).map_err(|e| OrchestratorError::DirCreation {
                path: log_dir.to_path_buf(),
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;

            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(MAX_LOG_FILES)
                .filename_prefix(prefix)
                .filename_suffix("log")
                .build(log_dir)
                .map_err(|e| OrchestratorError::Logging {
                    message: e.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            Some(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(false)
                    .with_writer(file_appender),
            )
        }
        None => None,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| OrchestratorError::Logging {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
}
