pub mod change_classification;
pub mod change_event;
pub mod failure;
pub mod login_data;
pub mod login_status;
pub mod method_identity;
pub mod method_patch;
pub mod method_patch_response;
pub mod patch_status;
pub mod server_lifecycle_state;
pub mod startup_progress;

mod blob;
