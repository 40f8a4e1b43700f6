use hp_core::{Failure, LoginStatus, PatchStatus, ServerLifecycleState, StartupProgress};

use serde::Serialize;

/// Read-only view of orchestrator state, with every predicate evaluated at
/// the moment the snapshot was taken.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestratorSnapshot {
    pub state: ServerLifecycleState,
    pub healthy: bool,
    pub started: bool,
    pub starting: bool,
    pub stopping: bool,
    pub compiling: bool,
    pub started_recently: bool,
    pub stopped_recently: bool,
    pub restarted_recently: bool,
    pub download_progress: f32,
    pub startup_progress: Option<StartupProgress>,
    pub startup_completed: bool,
    pub patch_status: PatchStatus,
    pub first_patch_attempted: bool,
    pub failures: Vec<Failure>,
    pub compile_error: bool,
    pub applied_patches: usize,
    pub login_status: Option<LoginStatus>,
}
