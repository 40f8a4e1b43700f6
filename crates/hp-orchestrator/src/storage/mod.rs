mod instance_lock;
mod patch_store;
mod session_marker;

pub use instance_lock::{InstanceLock, LockOwner};
pub use patch_store::{PatchStore, load_patches};
pub use session_marker::{SessionCheck, SessionMarker};

pub const SESSION_FILENAME: &str = "session";
pub const PATCHES_FILENAME: &str = "patches.json";
pub const LOCK_FILENAME: &str = "orchestrator.lock";
pub const LOGS_DIRNAME: &str = "logs";
