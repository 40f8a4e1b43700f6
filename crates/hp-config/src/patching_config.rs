use crate::{ConfigError, ConfigErrorResult, DEFAULT_COMPILE_ERROR_MARKER};

use serde::Deserialize;

/// User preferences around unsupported changes and asset sync.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PatchingConfig {
    /// Trigger a full recompile when an unsupported change is detected
    pub auto_recompile_unsupported_changes: bool,
    /// Recompile right away instead of waiting for the host window to gain focus
    pub recompile_immediately: bool,
    /// Permit the recompile while the host is in live-execution mode
    pub recompile_in_live_mode: bool,
    /// Forward non-code asset changes reported by the server
    pub all_asset_changes: bool,
    /// Substring identifying a fatal compiler diagnostic
    pub compile_error_marker: String,
}

impl Default for PatchingConfig {
    fn default() -> Self {
        Self {
            auto_recompile_unsupported_changes: true,
            recompile_immediately: false,
            recompile_in_live_mode: false,
            all_asset_changes: true,
            compile_error_marker: String::from(DEFAULT_COMPILE_ERROR_MARKER),
        }
    }
}

impl PatchingConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.compile_error_marker.trim().is_empty() {
            return Err(ConfigError::patching(
                "patching.compile_error_marker cannot be empty",
            ));
        }

        Ok(())
    }
}
