use hp_config::ConfigError;
use hp_core::CoreError;

use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Configuration invalid: {source} {location}")]
    Config {
        #[source]
        source: ConfigError,
        location: ErrorLocation,
    },

    #[error("Failed to create directory at {path}: {source} {location}")]
    DirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("IO error at {path}: {source} {location}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Failed to (de)serialize {path}: {source} {location}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("Session marker at {path} is malformed: {message} {location}")]
    InvalidSessionMarker {
        path: PathBuf,
        message: String,
        location: ErrorLocation,
    },

    #[error("Another orchestrator is already running (lock file: {path}) {location}")]
    AlreadyRunning {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Failed to acquire lock at {path}: {source} {location}")]
    LockAcquisition {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Patch server binary not found (searched: {searched}) {location}")]
    BinaryNotFound {
        searched: String,
        location: ErrorLocation,
    },

    #[error("Failed to spawn patch server: {source} {location}")]
    ProcessSpawn {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Patch server failed to become healthy within {timeout_secs}s {location}")]
    StartupTimeout {
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("Failed to initialize logging: {message} {location}")]
    Logging {
        message: String,
        location: ErrorLocation,
    },

    #[error("Orchestrator event loop is no longer running {location}")]
    ChannelClosed { location: ErrorLocation },
}

impl OrchestratorError {
    #[track_caller]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn channel_closed() -> Self {
        Self::ChannelClosed {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::Config { .. } => {
                "Configuration file has invalid settings. \
                   Check the logs for details or delete the config file to use defaults."
            }
            Self::AlreadyRunning { .. } => {
                "Another orchestrator instance owns this project. \
                   Close the other editor instance first."
            }
            Self::LockAcquisition { .. } | Self::DirCreation { .. } => {
                "Unable to write to the project cache directory. \
                   Check file permissions or available disk space."
            }
            Self::BinaryNotFound { .. } => {
                "The patch server is not installed. \
                   Run the download again or set server.binary_path."
            }
            Self::StartupTimeout { .. } => {
                "The patch server is taking too long to start. \
                   Try restarting it or check the server logs."
            }
            Self::InvalidSessionMarker { .. } | Self::Json { .. } => {
                "A cache file is corrupted. \
                   It will be recreated on the next launch."
            }
            _ => "An unexpected error occurred. Please check the logs for details.",
        }
    }
}

impl From<ConfigError> for OrchestratorError {
    #[track_caller]
    fn from(source: ConfigError) -> Self {
        Self::Config {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<OrchestratorError> for CoreError {
    #[track_caller]
    fn from(err: OrchestratorError) -> Self {
        CoreError::bootstrap(format!("{err}. {}", err.recovery_hint()))
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
