//! Live code-patching orchestrator.
//!
//! Keeps a running host process in sync with source edits by driving an
//! external patch-compilation server: lifecycle, health and patch polling,
//! change classification and the debounced full-recompile fallback.

mod build_info;
mod error;
mod event;
mod health;
mod lifecycle;
pub mod logging;
mod orchestrator;
mod patch_poller;
mod process;
mod recompile;
mod snapshot;
pub mod storage;

#[cfg(test)]
mod tests;

pub use build_info::BuildInfoThrottle;
pub use error::{OrchestratorError, Result as OrchestratorResult};
pub use health::HealthPoller;
pub use lifecycle::{HealthTransition, LifecycleController};
pub use orchestrator::{Collaborators, Orchestrator, OrchestratorHandle};
pub use patch_poller::{ApplyOutcome, PatchApplier, StatusTransition};
pub use process::ProcessBootstrap;
pub use recompile::{
    RECOMPILE_NOTIFICATION, RecompileContext, RecompileDecision, RecompileOrchestrator,
    SkipReason,
};
pub use snapshot::OrchestratorSnapshot;
