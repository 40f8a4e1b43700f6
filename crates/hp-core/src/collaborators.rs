//! Capability traits for everything the orchestrator talks to but does not own.
//!
//! Async traits are driven from background tasks; sync traits are only ever
//! called from the owner loop.

use crate::{
    CoreResult, LoginData, LoginStatus, MethodHandle, MethodIdentity, MethodPatchResponse,
    PatchStatus,
};

use std::path::Path;

use async_trait::async_trait;

/// Request/response surface of the patch-compilation server.
///
/// Every call carries its own timeout. A transport error means "unhealthy".
#[async_trait]
pub trait PatchServer: Send + Sync {
    /// Cheap reachability check.
    async fn check_health(&self) -> bool;

    async fn login_status(&self) -> CoreResult<LoginStatus>;

    async fn poll_method_patches(&self) -> CoreResult<MethodPatchResponse>;

    /// Long-poll for a status different from `current`.
    async fn poll_patch_status(&self, current: PatchStatus) -> CoreResult<PatchStatus>;

    /// Paths of non-code assets changed since the last poll.
    async fn poll_asset_changes(&self) -> CoreResult<Vec<String>>;

    async fn clear_patches(&self) -> CoreResult<()>;

    async fn request_compile(&self) -> CoreResult<()>;

    async fn prepare_build_info(&self) -> CoreResult<()>;
}

/// Starts and stops the server process.
#[async_trait]
pub trait ServerBootstrap: Send + Sync {
    async fn start(&self, login: Option<LoginData>) -> CoreResult<()>;

    async fn stop(&self) -> CoreResult<()>;
}

/// Fetches the server binary and asks the user for consent.
#[async_trait]
pub trait ServerDownloader: Send + Sync {
    /// 0.0..=1.0; 1.0 means the binary is present.
    fn progress(&self) -> f32;

    async fn confirm_download(&self) -> bool;

    async fn download(&self) -> CoreResult<()>;

    /// Asked once per fresh launch after the orchestrator itself was updated.
    async fn confirm_restart_after_update(&self, previous_version: &str) -> bool;
}

/// Host-side patch application, keyed by method identity.
pub trait ApplyEngine: Send {
    fn resolve(&mut self, identity: &MethodIdentity) -> CoreResult<MethodHandle>;

    /// Returns per-patch error messages; empty means applied.
    fn apply(&mut self, handle: MethodHandle, blob: &[u8]) -> Vec<String>;

    fn remove(&mut self, handle: MethodHandle) -> CoreResult<()>;

    fn clear_patched_methods(&mut self);
}

/// Keeps non-code resources in sync. Paths are relative to the project root.
pub trait AssetRefresher: Send {
    fn reimport(&mut self, relative_path: &Path) -> CoreResult<()>;

    fn delete(&mut self, relative_path: &Path) -> CoreResult<()>;
}

/// Regenerates project and solution metadata before a full compile.
#[async_trait]
pub trait BuildFileGenerator: Send + Sync {
    async fn generate(&self) -> CoreResult<()>;
}

/// The development environment hosting the orchestrator.
pub trait HostEnvironment: Send {
    fn has_focus(&self) -> bool;

    /// Host process currently executing in live mode.
    fn is_live(&self) -> bool;

    fn exit_live_mode(&mut self);

    /// Ask the host to run its own full recompile. Completion comes back as
    /// a compilation-finished signal.
    fn request_recompile(&mut self);

    /// Changes on every fresh launch, survives reloads.
    fn session_id(&self) -> u64;
}

pub trait UiNotifier: Send {
    fn repaint(&mut self);

    fn notify(&mut self, message: &str);
}
