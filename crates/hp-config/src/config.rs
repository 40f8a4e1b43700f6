use crate::{
    CONFIG_DIR_ENV, CONFIG_FILENAME, ConfigError, ConfigErrorResult, DEFAULT_CONFIG_DIR,
    LoggingConfig, PatchingConfig, PollingConfig, ProjectConfig, ServerConfig,
};

use std::path::PathBuf;
use std::str::FromStr;

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub polling: PollingConfig,
    pub patching: PatchingConfig,
    pub project: ProjectConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Resolve the config directory, read `config.toml` from it when present
    /// and layer `HP_*` environment overrides on top.
    ///
    /// The directory is created if missing. Validation is a separate step.
    pub fn load() -> ConfigErrorResult<Self> {
        let dir = Self::config_dir()?;
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::Io {
            path: dir.clone(),
            source: e,
        })?;

        let path = dir.join(CONFIG_FILENAME);
        let mut config = match std::fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents).map_err(|e| ConfigError::Toml {
                path: path.clone(),
                source: e,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(e) => return Err(ConfigError::Io { path, source: e }),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a TOML document without touching the environment.
    pub fn from_toml_str(contents: &str) -> ConfigErrorResult<Self> {
        toml::from_str(contents).map_err(|e| ConfigError::serde(e.to_string()))
    }

    /// `HP_CONFIG_DIR`, else `.hotpatch/` under the working directory.
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Some(dir) = env_value::<PathBuf>(CONFIG_DIR_ENV) {
            return Ok(dir);
        }

        std::env::current_dir()
            .map(|cwd| cwd.join(DEFAULT_CONFIG_DIR))
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.polling.validate()?;
        self.patching.validate()?;
        self.project.validate()
    }

    pub fn log_summary(&self) {
        info!(
            "Patch server at {} (request timeout {}s, health timeout {}ms)",
            self.server.base_url(),
            self.server.request_timeout_secs,
            self.server.health_timeout_ms
        );
        info!(
            "Polling every {}ms, status {}ms while booting / {}ms steady, heartbeat {}ms",
            self.polling.tick_interval_ms,
            self.polling.status_interval_startup_ms,
            self.polling.status_interval_steady_ms,
            self.polling.heartbeat_timeout_ms
        );
        info!(
            "Recompile: auto={} immediately={} in_live_mode={}; asset changes: {}",
            self.patching.auto_recompile_unsupported_changes,
            self.patching.recompile_immediately,
            self.patching.recompile_in_live_mode,
            self.patching.all_asset_changes
        );
        info!(
            "Project {} (sources {:?}, cache {})",
            self.project.root, self.project.source_roots, self.project.cache_dir
        );
    }

    fn apply_env_overrides(&mut self) {
        let server = &mut self.server;
        replace(&mut server.host, env_value("HP_SERVER_HOST"));
        replace(&mut server.port, env_value("HP_SERVER_PORT"));
        replace(&mut server.binary_path, env_optional("HP_SERVER_BINARY"));
        replace(
            &mut server.request_timeout_secs,
            env_value("HP_SERVER_REQUEST_TIMEOUT_SECS"),
        );
        replace(
            &mut server.health_timeout_ms,
            env_value("HP_SERVER_HEALTH_TIMEOUT_MS"),
        );
        replace(
            &mut server.expose_to_network,
            env_flag("HP_SERVER_EXPOSE_TO_NETWORK"),
        );

        let polling = &mut self.polling;
        replace(&mut polling.tick_interval_ms, env_value("HP_POLL_TICK_MS"));
        replace(
            &mut polling.status_interval_startup_ms,
            env_value("HP_POLL_STATUS_STARTUP_MS"),
        );
        replace(
            &mut polling.status_interval_steady_ms,
            env_value("HP_POLL_STATUS_STEADY_MS"),
        );
        replace(
            &mut polling.heartbeat_timeout_ms,
            env_value("HP_POLL_HEARTBEAT_TIMEOUT_MS"),
        );

        let patching = &mut self.patching;
        replace(
            &mut patching.auto_recompile_unsupported_changes,
            env_flag("HP_AUTO_RECOMPILE"),
        );
        replace(
            &mut patching.recompile_immediately,
            env_flag("HP_RECOMPILE_IMMEDIATELY"),
        );
        replace(
            &mut patching.recompile_in_live_mode,
            env_flag("HP_RECOMPILE_IN_LIVE_MODE"),
        );
        replace(
            &mut patching.all_asset_changes,
            env_flag("HP_ALL_ASSET_CHANGES"),
        );

        replace(&mut self.project.root, env_value("HP_PROJECT_ROOT"));
        replace(&mut self.project.cache_dir, env_value("HP_PROJECT_CACHE_DIR"));

        replace(&mut self.logging.level, env_value("HP_LOG_LEVEL"));
        replace(&mut self.logging.colored, env_flag("HP_LOG_COLORED"));
        replace(&mut self.logging.file, env_optional("HP_LOG_FILE"));
    }
}

fn replace<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Parsed value of `name`; unset or unparseable is `None`.
fn env_value<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.parse().ok()
}

/// Like [`env_value`], but an empty value clears the setting.
fn env_optional(name: &str) -> Option<Option<String>> {
    std::env::var(name)
        .ok()
        .map(|value| (!value.is_empty()).then_some(value))
}

/// `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`, case-insensitive.
/// Anything else leaves the setting alone.
fn env_flag(name: &str) -> Option<bool> {
    match std::env::var(name).ok()?.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
