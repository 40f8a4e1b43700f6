//! Messages into the owner loop.
//!
//! `Command`s come from [`crate::OrchestratorHandle`]; `Event`s come from the
//! ticker and from background tasks reporting their results. Background tasks
//! never touch orchestrator state directly.

use crate::OrchestratorSnapshot;

use hp_core::{ChangeEvent, CoreResult, LoginData, LoginStatus, MethodPatchResponse, PatchStatus};

use tokio::sync::oneshot;

#[derive(Debug)]
pub enum Command {
    Start {
        login: Option<LoginData>,
        reply: oneshot::Sender<bool>,
    },
    Stop {
        reply: oneshot::Sender<()>,
    },
    Restart {
        reply: oneshot::Sender<()>,
    },
    DownloadAndRun {
        login: Option<LoginData>,
        reply: oneshot::Sender<bool>,
    },
    CompilationFinished,
    FocusChanged {
        focused: bool,
    },
    FileChanged(ChangeEvent),
    ResetFailures,
    Snapshot {
        reply: oneshot::Sender<OrchestratorSnapshot>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

#[derive(Debug)]
pub enum Event {
    Tick,
    HealthChecked {
        healthy: bool,
    },
    StatusFetched(CoreResult<LoginStatus>),
    PatchesPolled(CoreResult<MethodPatchResponse>),
    PatchStatusPolled(CoreResult<PatchStatus>),
    AssetChangesPolled(CoreResult<Vec<String>>),
    StartFinished {
        result: CoreResult<()>,
        reply: oneshot::Sender<bool>,
    },
    StopFinished {
        result: CoreResult<()>,
        reply: oneshot::Sender<()>,
    },
    DownloadFinished {
        proceed: bool,
        login: Option<LoginData>,
        reply: oneshot::Sender<bool>,
    },
    RestartFinished {
        reply: oneshot::Sender<()>,
    },
    CompileRequested(CoreResult<()>),
    BuildInfoPrepared(CoreResult<()>),
    UpdatePromptAnswered {
        restart: bool,
    },
    /// A command issued by a composite operation running in the background
    Internal(Command),
}
