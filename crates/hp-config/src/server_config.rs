use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_HEALTH_TIMEOUT_MS, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SHUTDOWN_TIMEOUT_SECS, DEFAULT_STARTUP_TIMEOUT_SECS,
    MAX_REQUEST_TIMEOUT_SECS, MIN_PORT,
};

use std::time::Duration;

use serde::Deserialize;

/// Connection settings for the patch-compilation server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Explicit server binary; when unset the bootstrap searches known locations
    pub binary_path: Option<String>,
    /// Timeout for status, patch and compile requests
    pub request_timeout_secs: u64,
    /// Timeout for the cheap reachability check
    pub health_timeout_ms: u64,
    pub startup_timeout_secs: u64,
    pub shutdown_timeout_secs: u64,
    /// Allow the server to listen on a non-loopback address
    pub expose_to_network: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
            binary_path: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            health_timeout_ms: DEFAULT_HEALTH_TIMEOUT_MS,
            startup_timeout_secs: DEFAULT_STARTUP_TIMEOUT_SECS,
            shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            expose_to_network: false,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.port < MIN_PORT {
            return Err(ConfigError::server(format!(
                "server.port must be >= {}, got {}",
                MIN_PORT, self.port
            )));
        }

        if self.request_timeout_secs == 0 || self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS
        {
            return Err(ConfigError::server(format!(
                "server.request_timeout_secs must be 1-{}, got {}",
                MAX_REQUEST_TIMEOUT_SECS, self.request_timeout_secs
            )));
        }

        if self.health_timeout_ms == 0 {
            return Err(ConfigError::server("server.health_timeout_ms must be > 0"));
        }

        if self.startup_timeout_secs == 0 {
            return Err(ConfigError::server("server.startup_timeout_secs must be > 0"));
        }

        let loopback = self.host == DEFAULT_HOST || self.host == "localhost";
        if !loopback && !self.expose_to_network {
            return Err(ConfigError::server(format!(
                "server.host must be {DEFAULT_HOST} or localhost unless expose_to_network is set"
            )));
        }

        Ok(())
    }

    /// Base URL of the server's HTTP endpoint.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}
