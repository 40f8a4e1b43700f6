pub mod classifier;
pub mod collaborators;
pub mod error;
pub mod failures;
pub mod models;

#[cfg(test)]
mod tests;

pub use classifier::ChangeClassifier;
pub use collaborators::{
    ApplyEngine, AssetRefresher, BuildFileGenerator, HostEnvironment, PatchServer,
    ServerBootstrap, ServerDownloader, UiNotifier,
};
pub use error::{CoreError, Result as CoreResult};
pub use failures::{CompileBatchOutcome, Failures};
pub use models::change_classification::{ChangeClassification, ChangeKind, UnsupportedChange};
pub use models::change_event::ChangeEvent;
pub use models::failure::{Failure, FailureCategory};
pub use models::login_data::LoginData;
pub use models::login_status::LoginStatus;
pub use models::method_identity::{MethodHandle, MethodIdentity};
pub use models::method_patch::MethodPatch;
pub use models::method_patch_response::MethodPatchResponse;
pub use models::patch_status::PatchStatus;
pub use models::server_lifecycle_state::ServerLifecycleState;
pub use models::startup_progress::StartupProgress;
