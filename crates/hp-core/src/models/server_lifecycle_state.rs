use serde::Serialize;

/// Lifecycle of the patch-compilation server as seen by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerLifecycleState {
    /// Server is not running
    #[default]
    Stopped,
    /// Waiting for the server binary download to be accepted and finish
    Downloading,
    /// Bootstrap requested, waiting for health and full startup progress
    Starting,
    /// Server is healthy and reports startup complete
    Running,
    /// Stop requested, teardown in progress
    Stopping,
    /// Between the stop and start halves of a restart
    Restarting,
}

impl ServerLifecycleState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Stopped => "stopped",
            Self::Downloading => "downloading",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Restarting => "restarting",
        }
    }
}

impl std::fmt::Display for ServerLifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
