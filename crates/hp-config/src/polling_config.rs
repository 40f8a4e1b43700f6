use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_COMPILE_WAIT_SECS, DEFAULT_HEARTBEAT_TIMEOUT_MS,
    DEFAULT_PREPARE_BUILD_INFO_INTERVAL_SECS, DEFAULT_RECOMPILE_DEBOUNCE_MS,
    DEFAULT_STATUS_INTERVAL_STARTUP_MS, DEFAULT_STATUS_INTERVAL_STEADY_MS,
    DEFAULT_TICK_INTERVAL_MS, MIN_TICK_INTERVAL_MS,
};

use std::time::Duration;

use serde::Deserialize;

/// Timer settings for the health, status and patch pollers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Low-level timer driving health checks and patch polls
    pub tick_interval_ms: u64,
    /// Status fetch interval while the server is booting
    pub status_interval_startup_ms: u64,
    /// Status fetch interval once the server is steady
    pub status_interval_steady_ms: u64,
    /// Window in which a start/stop/restart is considered "recent"
    pub heartbeat_timeout_ms: u64,
    /// How long `compiling` stays true after a compile request
    pub compile_wait_secs: u64,
    pub prepare_build_info_interval_secs: u64,
    /// Minimum gap between two unsupported-change recompiles
    pub recompile_debounce_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            status_interval_startup_ms: DEFAULT_STATUS_INTERVAL_STARTUP_MS,
            status_interval_steady_ms: DEFAULT_STATUS_INTERVAL_STEADY_MS,
            heartbeat_timeout_ms: DEFAULT_HEARTBEAT_TIMEOUT_MS,
            compile_wait_secs: DEFAULT_COMPILE_WAIT_SECS,
            prepare_build_info_interval_secs: DEFAULT_PREPARE_BUILD_INFO_INTERVAL_SECS,
            recompile_debounce_ms: DEFAULT_RECOMPILE_DEBOUNCE_MS,
        }
    }
}

impl PollingConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.tick_interval_ms < MIN_TICK_INTERVAL_MS {
            return Err(ConfigError::polling(format!(
                "polling.tick_interval_ms must be >= {}, got {}",
                MIN_TICK_INTERVAL_MS, self.tick_interval_ms
            )));
        }

        if self.status_interval_startup_ms == 0 || self.status_interval_steady_ms == 0 {
            return Err(ConfigError::polling("polling status intervals must be > 0"));
        }

        if self.status_interval_startup_ms > self.status_interval_steady_ms {
            return Err(ConfigError::polling(format!(
                "polling.status_interval_startup_ms ({}) must not exceed status_interval_steady_ms ({})",
                self.status_interval_startup_ms, self.status_interval_steady_ms
            )));
        }

        if self.heartbeat_timeout_ms == 0 {
            return Err(ConfigError::polling("polling.heartbeat_timeout_ms must be > 0"));
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn status_interval_startup(&self) -> Duration {
        Duration::from_millis(self.status_interval_startup_ms)
    }

    pub fn status_interval_steady(&self) -> Duration {
        Duration::from_millis(self.status_interval_steady_ms)
    }

    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_millis(self.heartbeat_timeout_ms)
    }

    pub fn compile_wait(&self) -> Duration {
        Duration::from_secs(self.compile_wait_secs)
    }

    pub fn prepare_build_info_interval(&self) -> Duration {
        Duration::from_secs(self.prepare_build_info_interval_secs)
    }

    pub fn recompile_debounce(&self) -> Duration {
        Duration::from_millis(self.recompile_debounce_ms)
    }
}
