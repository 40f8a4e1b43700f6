mod config;
mod error;
mod log_level;
mod logging_config;
mod patching_config;
mod polling_config;
mod project_config;
mod server_config;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use patching_config::PatchingConfig;
pub use polling_config::PollingConfig;
pub use project_config::ProjectConfig;
pub use server_config::ServerConfig;

const CONFIG_DIR_ENV: &str = "HP_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".hotpatch";
const CONFIG_FILENAME: &str = "config.toml";

// Server
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 33242;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_HEALTH_TIMEOUT_MS: u64 = 5000;
const DEFAULT_STARTUP_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;
const MIN_PORT: u16 = 1024;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

// Polling
const DEFAULT_TICK_INTERVAL_MS: u64 = 500;
const DEFAULT_STATUS_INTERVAL_STARTUP_MS: u64 = 500;
const DEFAULT_STATUS_INTERVAL_STEADY_MS: u64 = 2000;
const DEFAULT_HEARTBEAT_TIMEOUT_MS: u64 = 5000;
const DEFAULT_COMPILE_WAIT_SECS: u64 = 5;
const DEFAULT_PREPARE_BUILD_INFO_INTERVAL_SECS: u64 = 5;
const DEFAULT_RECOMPILE_DEBOUNCE_MS: u64 = 1000;
const MIN_TICK_INTERVAL_MS: u64 = 50;

// Patching
const DEFAULT_COMPILE_ERROR_MARKER: &str = "error CS";

// Project
const DEFAULT_PROJECT_ROOT: &str = ".";
const DEFAULT_SOURCE_ROOTS: [&str; 2] = ["Assets", "Packages"];
const DEFAULT_CACHE_DIR: &str = "Library/HotPatch";

// Logging
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
