use crate::MethodIdentity;

use std::panic::Location;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

/// Errors crossing a collaborator boundary.
///
/// None of these terminate the orchestrator: transport failures degrade to
/// "unhealthy", apply failures are recorded per patch.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Patch server unreachable: {message} {location}")]
    Transport {
        message: String,
        location: ErrorLocation,
    },

    #[error("Patch server rejected request ({status}): {message} {location}")]
    Server {
        status: u16,
        message: String,
        location: ErrorLocation,
    },

    #[error("Failed to resolve method {identity}: {message} {location}")]
    Resolve {
        identity: MethodIdentity,
        message: String,
        location: ErrorLocation,
    },

    #[error("Failed to apply patch to {identity}: {message} {location}")]
    Apply {
        identity: MethodIdentity,
        message: String,
        location: ErrorLocation,
    },

    #[error("Server bootstrap failed: {message} {location}")]
    Bootstrap {
        message: String,
        location: ErrorLocation,
    },

    #[error("Asset refresh failed for {path}: {message} {location}")]
    Refresh {
        path: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Server download failed: {message} {location}")]
    Download {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid patch status: {value} {location}")]
    InvalidPatchStatus {
        value: String,
        location: ErrorLocation,
    },
}

impl CoreError {
    #[track_caller]
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn server<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Server {
            status,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn resolve<S: Into<String>>(identity: &MethodIdentity, message: S) -> Self {
        Self::Resolve {
            identity: identity.clone(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn apply<S: Into<String>>(identity: &MethodIdentity, message: S) -> Self {
        Self::Apply {
            identity: identity.clone(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn download<S: Into<String>>(message: S) -> Self {
        Self::Download {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn bootstrap<S: Into<String>>(message: S) -> Self {
        Self::Bootstrap {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn refresh<S: Into<String>>(path: &str, message: S) -> Self {
        Self::Refresh {
            path: path.to_string(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Server unreachable; retried next tick, never surfaced as a failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// The message without the captured location, for user-facing failure text.
    pub fn summary(&self) -> String {
        match self {
            Self::Transport { message, .. }
            | Self::Server { message, .. }
            | Self::Bootstrap { message, .. }
            | Self::Download { message, .. } => message.clone(),
            Self::Resolve {
                identity, message, ..
            }
            | Self::Apply {
                identity, message, ..
            } => format!("{identity}: {message}"),
            Self::Refresh { path, message, .. } => format!("{path}: {message}"),
            Self::InvalidPatchStatus { value, .. } => format!("invalid patch status {value}"),
        }
    }
}

pub type Result<T> = StdResult<T, CoreError>;
