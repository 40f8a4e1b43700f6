//! Three-line marker distinguishing a fresh launch from a reload.
//!
//! ```text
//! 1            <- format version
//! 8842197      <- session id
//! 0.1.0        <- orchestrator version
//! ```

use crate::{OrchestratorError, OrchestratorResult};

use std::panic::Location;
use std::path::Path;

use error_location::ErrorLocation;
use tracing::info;

const FORMAT_VERSION: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMarker {
    pub session_id: u64,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCheck {
    /// Session id differs from the stored one (or nothing was stored)
    pub fresh_launch: bool,
    /// Previous version, when a fresh launch follows an update
    pub updated_from: Option<String>,
}

impl SessionMarker {
    pub fn new(session_id: u64, version: impl Into<String>) -> Self {
        Self {
            session_id,
            version: version.into(),
        }
    }

    /// Read the marker. Missing file is `None`; wrong format is an error.
    pub fn read(path: &Path) -> OrchestratorResult<Option<Self>> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(OrchestratorError::io(path, e)),
        };

        let invalid = |message: &str| OrchestratorError::InvalidSessionMarker {
            path: path.to_path_buf(),
            message: message.to_string(),
            location: ErrorLocation::from(Location::caller()),
        };

        let mut lines = contents.lines();
        if lines.next() != Some(FORMAT_VERSION) {
            return Err(invalid("unsupported format version"));
        }
        let session_id = lines
            .next()
            .and_then(|l| l.trim().parse().ok())
            .ok_or_else(|| invalid("missing or non-numeric session id"))?;
        let version = lines
            .next()
            .map(|l| l.trim().to_string())
            .ok_or_else(|| invalid("missing version"))?;

        Ok(Some(Self {
            session_id,
            version,
        }))
    }

    pub fn write(&self, path: &Path) -> OrchestratorResult<()> {
        let contents = format!("{}\n{}\n{}\n", FORMAT_VERSION, self.session_id, self.version);
        std::fs::write(path, contents).map_err(|e| OrchestratorError::io(path, e))
    }

    /// Compare against the stored marker and rewrite it on a fresh launch.
    /// A corrupt marker counts as a fresh launch.
    pub fn check_and_update(&self, path: &Path) -> OrchestratorResult<SessionCheck> {
        let previous = match Self::read(path) {
            Ok(previous) => previous,
            Err(e) => {
                tracing::warn!("{e}");
                None
            }
        };

        if let Some(previous) = &previous
            && previous.session_id == self.session_id
        {
            return Ok(SessionCheck {
                fresh_launch: false,
                updated_from: None,
            });
        }

        self.write(path)?;

        let updated_from = previous
            .map(|p| p.version)
            .filter(|v| *v != self.version);
        if let Some(from) = &updated_from {
            info!("Orchestrator updated from {} to {}", from, self.version);
        }

        Ok(SessionCheck {
            fresh_launch: true,
            updated_from,
        })
    }
}
