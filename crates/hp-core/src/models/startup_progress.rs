use serde::{Deserialize, Serialize};

pub const DEFAULT_STARTUP_STATUS: &str = "Starting patch server";

/// Boot progress reported by the server itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartupProgress {
    /// Clamped to 0.0..=1.0
    pub fraction: f32,
    pub status_text: String,
}

impl StartupProgress {
    pub fn new(fraction: f32, status_text: impl Into<String>) -> Self {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        Self {
            fraction,
            status_text: status_text.into(),
        }
    }

    /// Progress right after a start request, before the server reports anything.
    pub fn initial() -> Self {
        Self::new(0.0, DEFAULT_STARTUP_STATUS)
    }

    #[allow(clippy::float_cmp)]
    pub fn is_complete(&self) -> bool {
        self.fraction == 1.0
    }
}
