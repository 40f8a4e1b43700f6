use crate::StartupProgress;
use crate::models::startup_progress::DEFAULT_STARTUP_STATUS;

use serde::{Deserialize, Serialize};

/// Richer status returned by the server once it is reachable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginStatus {
    pub startup_progress: f32,
    pub startup_status: Option<String>,
    pub is_licensed: bool,
    pub license_expires_at: Option<String>,
    pub free_session_running: bool,
    pub free_session_end_time: Option<String>,
    pub last_license_error: Option<String>,
    pub request_error: Option<String>,
}

impl LoginStatus {
    /// Startup progress carried by this status, with the default text when blank.
    pub fn progress(&self) -> StartupProgress {
        let text = match self.startup_status.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => DEFAULT_STARTUP_STATUS,
        };
        StartupProgress::new(self.startup_progress, text)
    }

    /// License/session fields that, when changed, warrant re-sending build info.
    pub fn session_changed(&self, other: &LoginStatus) -> bool {
        self.free_session_running != other.free_session_running
            || self.free_session_end_time != other.free_session_end_time
            || self.license_expires_at != other.license_expires_at
    }
}
