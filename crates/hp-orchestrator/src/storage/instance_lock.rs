//! Single-writer guard for the applied-patch file.

use crate::{OrchestratorError, OrchestratorResult};

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::panic::Location;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::info;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use super::LOCK_FILENAME;

#[cfg(unix)]
const LOCK_FILE_MODE: u32 = 0o600;

/// Who holds the lock. Written as JSON into the lock file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockOwner {
    pub pid: u32,
    pub version: String,
    pub acquired_at: DateTime<Utc>,
}

impl LockOwner {
    fn current(version: &str) -> Self {
        Self {
            pid: std::process::id(),
            version: version.to_string(),
            acquired_at: Utc::now(),
        }
    }

    /// `None` when the file is missing or unreadable.
    fn read(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// A lock left by this process (a reload) or by a dead one can be taken over.
    fn is_stale(&self) -> bool {
        self.pid == std::process::id() || !pid_alive(self.pid)
    }
}

/// Held for the lifetime of an orchestrator; removes its file on drop.
#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
    owner: LockOwner,
    held: bool,
}

impl InstanceLock {
    /// Claim `<cache_dir>/orchestrator.lock`.
    ///
    /// The file is created with `create_new`, so two processes racing past
    /// the staleness check cannot both succeed.
    pub fn acquire(cache_dir: &Path, version: &str) -> OrchestratorResult<Self> {
        let path = cache_dir.join(LOCK_FILENAME);

        match LockOwner::read(&path) {
            Some(existing) if !existing.is_stale() => {
                return Err(already_running(&path));
            }
            Some(existing) => {
                info!(
                    "Taking over lock from PID {} (version {})",
                    existing.pid, existing.version
                );
                remove_if_present(&path)?;
            }
            None if path.exists() => {
                info!("Replacing unreadable lock file {}", path.display());
                remove_if_present(&path)?;
            }
            None => {}
        }

        let owner = LockOwner::current(version);
        let json =
            serde_json::to_vec_pretty(&owner).map_err(|e| OrchestratorError::json(&path, e))?;

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(LOCK_FILE_MODE);

        let mut file = match options.open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Err(already_running(&path)),
            Err(e) => {
                return Err(OrchestratorError::LockAcquisition {
                    path,
                    source: e,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };
        file.write_all(&json)
            .and_then(|()| file.sync_all())
            .map_err(|e| OrchestratorError::io(&path, e))?;

        Ok(Self {
            path,
            owner,
            held: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn owner(&self) -> &LockOwner {
        &self.owner
    }

    /// Remove the lock file. Also runs on drop.
    pub fn release(&mut self) {
        if std::mem::take(&mut self.held) {
            std::fs::remove_file(&self.path).ok();
        }
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        self.release();
    }
}

#[track_caller]
fn already_running(path: &Path) -> OrchestratorError {
    OrchestratorError::AlreadyRunning {
        path: path.to_path_buf(),
        location: ErrorLocation::from(Location::caller()),
    }
}

fn remove_if_present(path: &Path) -> OrchestratorResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(OrchestratorError::io(path, e)),
    }
}

#[cfg(unix)]
fn pid_alive(pid: u32) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };
    // EPERM: exists but owned by someone else
    matches!(kill(Pid::from_raw(raw), None), Ok(()) | Err(Errno::EPERM))
}

#[cfg(windows)]
fn pid_alive(pid: u32) -> bool {
    use windows_sys::Win32::Foundation::{CloseHandle, STILL_ACTIVE};
    use windows_sys::Win32::System::Threading::{
        GetExitCodeProcess, OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION,
    };

    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, 0, pid);
        if handle.is_null() {
            return false;
        }

        let mut exit_code: u32 = 0;
        let queried = GetExitCodeProcess(handle, &mut exit_code) != 0;
        CloseHandle(handle);

        queried && exit_code == STILL_ACTIVE as u32
    }
}
