//! Patch server process bootstrap: spawn detached, wait for health, stop.

use crate::{OrchestratorError, OrchestratorResult};

use hp_client::PatchServerClient;
use hp_config::ServerConfig;
use hp_core::{CoreError, CoreResult, LoginData, PatchServer, ServerBootstrap};

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use error_location::ErrorLocation;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{info, warn};

#[cfg(windows)]
pub const SERVER_BINARY_NAME: &str = "hp-server.exe";
#[cfg(not(windows))]
pub const SERVER_BINARY_NAME: &str = "hp-server";

pub const SHUTDOWN_PATH: &str = "/shutdown";

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Starts the patch server as a standalone detached process.
pub struct ProcessBootstrap {
    config: ServerConfig,
    project_root: PathBuf,
    cache_dir: PathBuf,
    client: PatchServerClient,
    server_pid: Mutex<Option<u32>>,
}

impl ProcessBootstrap {
    pub fn new(
        config: ServerConfig,
        project_root: PathBuf,
        cache_dir: PathBuf,
    ) -> OrchestratorResult<Self> {
        let client = PatchServerClient::from_config(&config).map_err(|e| {
            OrchestratorError::ProcessSpawn {
                source: std::io::Error::other(e.to_string()),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        Ok(Self {
            config,
            project_root,
            cache_dir,
            client,
            server_pid: Mutex::new(None),
        })
    }

    /// Candidate binary locations in search order: the configured path, a
    /// sibling of the current executable, then the downloaded copy.
    fn binary_candidates(&self) -> Vec<(&'static str, PathBuf)> {
        let mut candidates = Vec::with_capacity(3);
        if let Some(configured) = &self.config.binary_path {
            candidates.push(("configured", PathBuf::from(configured)));
        }
        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            candidates.push(("sibling", exe_dir.join(SERVER_BINARY_NAME)));
        }
        candidates.push((
            "downloaded",
            self.cache_dir.join("bin").join(SERVER_BINARY_NAME),
        ));
        candidates
    }

    pub fn find_server_binary(&self) -> OrchestratorResult<PathBuf> {
        let candidates = self.binary_candidates();

        if let Some((origin, path)) = candidates.iter().find(|(_, path)| path.is_file()) {
            info!("Using patch server ({origin}): {}", path.display());
            return Ok(path.clone());
        }

        let searched = candidates
            .iter()
            .map(|(_, path)| path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Err(OrchestratorError::BinaryNotFound {
            searched,
            location: ErrorLocation::from(Location::caller()),
        })
    }

    async fn spawn_process(&self, binary: &Path) -> OrchestratorResult<u32> {
        let log_dir = self.cache_dir.join(crate::storage::LOGS_DIRNAME);
        std::fs::create_dir_all(&log_dir).map_err(|e| OrchestratorError::DirCreation {
            path: log_dir.clone(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        let mut cmd = std::process::Command::new(binary);
        cmd.current_dir(&self.project_root)
            .env("HP_SERVER_PORT", self.config.port.to_string())
            .env("HP_SERVER_HOST", &self.config.host)
            .env("HP_SERVER_LOG_DIR", &log_dir);

        // New session so the server outlives an editor crash
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            unsafe {
                cmd.pre_exec(|| {
                    nix::unistd::setsid().map_err(std::io::Error::from)?;
                    Ok(())
                });
            }
        }

        let pid = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|child| child.id())
            .map_err(|e| OrchestratorError::ProcessSpawn {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;
        info!("Spawned patch server (pid {pid}) from {}", binary.display());

        Ok(pid)
    }

    /// Poll health until it matches `healthy` or `timeout` elapses.
    async fn wait_for_health(&self, healthy: bool, timeout: Duration) -> bool {
        let start = Instant::now();
        while start.elapsed() < timeout {
            if self.client.check_health().await == healthy {
                return true;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
        false
    }

    async fn start_inner(&self) -> OrchestratorResult<()> {
        if self.client.check_health().await {
            info!("Patch server already running, adopting it");
            return Ok(());
        }

        let binary = self.find_server_binary()?;
        let pid = self.spawn_process(&binary).await?;
        *self.server_pid.lock().await = Some(pid);

        let timeout = self.config.startup_timeout();
        if !self.wait_for_health(true, timeout).await {
            return Err(OrchestratorError::StartupTimeout {
                timeout_secs: timeout.as_secs(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!("Patch server is healthy");
        Ok(())
    }

    async fn stop_inner(&self) {
        let pid = self.server_pid.lock().await.take();

        let graceful = match self.client.post(SHUTDOWN_PATH).await {
            Ok(()) => {
                info!("Graceful shutdown request acknowledged");
                true
            }
            Err(e) => {
                warn!("Failed to send shutdown request: {e}");
                false
            }
        };

        if !graceful && let Some(pid) = pid {
            terminate(pid);
        }

        if self
            .wait_for_health(false, self.config.shutdown_timeout())
            .await
        {
            info!("Patch server stopped responding, shutdown complete");
            return;
        }

        if let Some(pid) = pid {
            info!("Force killing patch server (PID: {})", pid);
            force_kill(pid);
        } else {
            warn!("Patch server still responding and no PID is known");
        }
    }
}

#[async_trait]
impl ServerBootstrap for ProcessBootstrap {
    async fn start(&self, login: Option<LoginData>) -> CoreResult<()> {
        if login.is_some() {
            tracing::debug!("Login data is forwarded by the server's own login flow");
        }
        self.start_inner().await.map_err(CoreError::from)
    }

    async fn stop(&self) -> CoreResult<()> {
        self.stop_inner().await;
        Ok(())
    }
}

#[cfg(unix)]
fn send_signal(pid: u32, signal: nix::sys::signal::Signal) {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return;
    };
    if let Err(e) = kill(Pid::from_raw(raw), signal) {
        warn!("Failed to send {signal} to pid {pid}: {e}");
    }
}

#[cfg(unix)]
fn terminate(pid: u32) {
    info!("Sending SIGTERM to patch server (pid {pid})");
    send_signal(pid, nix::sys::signal::Signal::SIGTERM);
}

#[cfg(unix)]
fn force_kill(pid: u32) {
    send_signal(pid, nix::sys::signal::Signal::SIGKILL);
}

#[cfg(windows)]
fn terminate(pid: u32) {
    use windows_sys::Win32::System::Console::{CTRL_BREAK_EVENT, GenerateConsoleCtrlEvent};

    info!("Sending CTRL_BREAK to patch server (pid {pid})");
    unsafe {
        GenerateConsoleCtrlEvent(CTRL_BREAK_EVENT, pid);
    }
}

#[cfg(windows)]
fn force_kill(pid: u32) {
    let status = std::process::Command::new("taskkill")
        .args(["/F", "/T", "/PID"])
        .arg(pid.to_string())
        .stdout(Stdio::null())
        .status();
    if let Err(e) = status {
        warn!("taskkill failed for pid {pid}: {e}");
    }
}
