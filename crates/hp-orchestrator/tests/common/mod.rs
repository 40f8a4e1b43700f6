#![allow(dead_code)]

use hp_config::Config;
use hp_core::{
    ApplyEngine, AssetRefresher, BuildFileGenerator, CoreError, CoreResult, HostEnvironment,
    LoginData, LoginStatus, MethodHandle, MethodIdentity, MethodPatch, MethodPatchResponse,
    PatchServer, PatchStatus, ServerBootstrap, ServerDownloader, UiNotifier,
};
use hp_orchestrator::{
    Collaborators, Orchestrator, OrchestratorHandle, OrchestratorSnapshot,
};

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::task::JoinHandle;

pub const SESSION_ID: u64 = 7;

// =========================================================================
// Patch server
// =========================================================================

/// In-memory patch server. Long polls are emulated with a short sleep so
/// the loop does not spin.
#[derive(Default)]
pub struct FakeServer {
    pub healthy: AtomicBool,
    pub login: Mutex<LoginStatus>,
    pub responses: Mutex<VecDeque<MethodPatchResponse>>,
    pub patch_status: Mutex<PatchStatus>,
    pub asset_changes: Mutex<VecDeque<Vec<String>>>,
    pub clear_calls: AtomicUsize,
    pub compile_calls: AtomicUsize,
    pub build_info_calls: AtomicUsize,
}

impl FakeServer {
    pub fn set_running(&self, running: bool) {
        let mut login = self.login.lock().unwrap();
        login.startup_progress = if running { 1.0 } else { 0.0 };
        login.startup_status = Some(String::from("Ready"));
        self.healthy.store(running, Ordering::SeqCst);
    }

    pub fn push_response(&self, response: MethodPatchResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn push_asset_changes(&self, paths: Vec<String>) {
        self.asset_changes.lock().unwrap().push_back(paths);
    }

    fn require_healthy(&self) -> CoreResult<()> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CoreError::transport("connection refused"))
        }
    }
}

#[async_trait]
impl PatchServer for FakeServer {
    async fn check_health(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    async fn login_status(&self) -> CoreResult<LoginStatus> {
        self.require_healthy()?;
        Ok(self.login.lock().unwrap().clone())
    }

    async fn poll_method_patches(&self) -> CoreResult<MethodPatchResponse> {
        self.require_healthy()?;
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(response) => Ok(response),
            None => {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(MethodPatchResponse::default())
            }
        }
    }

    async fn poll_patch_status(&self, current: PatchStatus) -> CoreResult<PatchStatus> {
        self.require_healthy()?;
        let status = *self.patch_status.lock().unwrap();
        if status == current {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        Ok(status)
    }

    async fn poll_asset_changes(&self) -> CoreResult<Vec<String>> {
        self.require_healthy()?;
        let next = self.asset_changes.lock().unwrap().pop_front();
        match next {
            Some(paths) => Ok(paths),
            None => {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(Vec::new())
            }
        }
    }

    async fn clear_patches(&self) -> CoreResult<()> {
        self.require_healthy()?;
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn request_compile(&self) -> CoreResult<()> {
        self.require_healthy()?;
        self.compile_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn prepare_build_info(&self) -> CoreResult<()> {
        self.require_healthy()?;
        self.build_info_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =========================================================================
// Bootstrap / downloader
// =========================================================================

/// Flips the fake server up or down after a delay and tracks overlap.
pub struct FakeBootstrap {
    server: Arc<FakeServer>,
    delay: Duration,
    active: AtomicUsize,
    pub max_concurrent: AtomicUsize,
    pub start_calls: AtomicUsize,
    pub stop_calls: AtomicUsize,
    pub fail_start: AtomicBool,
}

impl FakeBootstrap {
    pub fn new(server: Arc<FakeServer>) -> Self {
        Self {
            server,
            delay: Duration::from_millis(100),
            active: AtomicUsize::new(0),
            max_concurrent: AtomicUsize::new(0),
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            fail_start: AtomicBool::new(false),
        }
    }

    async fn in_flight(&self, running: bool) {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_concurrent.fetch_max(active, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.server.set_running(running);
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ServerBootstrap for FakeBootstrap {
    async fn start(&self, _login: Option<LoginData>) -> CoreResult<()> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(CoreError::bootstrap("binary missing"));
        }
        self.in_flight(true).await;
        Ok(())
    }

    async fn stop(&self) -> CoreResult<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.in_flight(false).await;
        Ok(())
    }
}

pub struct FakeDownloader {
    progress: Mutex<f32>,
    pub accept: AtomicBool,
    pub fail_download: AtomicBool,
    pub restart_after_update: AtomicBool,
    pub download_calls: AtomicUsize,
    pub update_prompts: Mutex<Vec<String>>,
}

impl FakeDownloader {
    pub fn new(progress: f32) -> Self {
        Self {
            progress: Mutex::new(progress),
            accept: AtomicBool::new(true),
            fail_download: AtomicBool::new(false),
            restart_after_update: AtomicBool::new(false),
            download_calls: AtomicUsize::new(0),
            update_prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ServerDownloader for FakeDownloader {
    fn progress(&self) -> f32 {
        *self.progress.lock().unwrap()
    }

    async fn confirm_download(&self) -> bool {
        self.accept.load(Ordering::SeqCst)
    }

    async fn download(&self) -> CoreResult<()> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_download.load(Ordering::SeqCst) {
            return Err(CoreError::download("checksum mismatch"));
        }
        *self.progress.lock().unwrap() = 1.0;
        Ok(())
    }

    async fn confirm_restart_after_update(&self, previous_version: &str) -> bool {
        self.update_prompts
            .lock()
            .unwrap()
            .push(previous_version.to_string());
        self.restart_after_update.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct FakeBuildFiles {
    pub generate_calls: AtomicUsize,
}

#[async_trait]
impl BuildFileGenerator for FakeBuildFiles {
    async fn generate(&self) -> CoreResult<()> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =========================================================================
// Host-side collaborators
// =========================================================================

#[derive(Default)]
pub struct EngineLog {
    pub handles: HashMap<MethodIdentity, MethodHandle>,
    pub applied: Vec<(MethodHandle, Vec<u8>)>,
    pub removed: Vec<MethodHandle>,
    pub clears: usize,
}

pub struct FakeApplyEngine(pub Arc<Mutex<EngineLog>>);

impl ApplyEngine for FakeApplyEngine {
    fn resolve(&mut self, identity: &MethodIdentity) -> CoreResult<MethodHandle> {
        let mut log = self.0.lock().unwrap();
        let next = MethodHandle(log.handles.len() as u64);
        Ok(*log.handles.entry(identity.clone()).or_insert(next))
    }

    fn apply(&mut self, handle: MethodHandle, blob: &[u8]) -> Vec<String> {
        self.0.lock().unwrap().applied.push((handle, blob.to_vec()));
        Vec::new()
    }

    fn remove(&mut self, handle: MethodHandle) -> CoreResult<()> {
        self.0.lock().unwrap().removed.push(handle);
        Ok(())
    }

    fn clear_patched_methods(&mut self) {
        self.0.lock().unwrap().clears += 1;
    }
}

#[derive(Default)]
pub struct RefreshLog {
    pub reimported: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
}

pub struct FakeRefresher(pub Arc<Mutex<RefreshLog>>);

impl AssetRefresher for FakeRefresher {
    fn reimport(&mut self, relative_path: &Path) -> CoreResult<()> {
        self.0
            .lock()
            .unwrap()
            .reimported
            .push(relative_path.to_path_buf());
        Ok(())
    }

    fn delete(&mut self, relative_path: &Path) -> CoreResult<()> {
        self.0
            .lock()
            .unwrap()
            .deleted
            .push(relative_path.to_path_buf());
        Ok(())
    }
}

#[derive(Default)]
pub struct HostState {
    pub focused: AtomicBool,
    pub live: AtomicBool,
    pub exit_live_calls: AtomicUsize,
    pub recompile_requests: AtomicUsize,
    pub session_id: AtomicU64,
}

pub struct FakeHost(pub Arc<HostState>);

impl HostEnvironment for FakeHost {
    fn has_focus(&self) -> bool {
        self.0.focused.load(Ordering::SeqCst)
    }

    fn is_live(&self) -> bool {
        self.0.live.load(Ordering::SeqCst)
    }

    fn exit_live_mode(&mut self) {
        self.0.exit_live_calls.fetch_add(1, Ordering::SeqCst);
        self.0.live.store(false, Ordering::SeqCst);
    }

    fn request_recompile(&mut self) {
        self.0.recompile_requests.fetch_add(1, Ordering::SeqCst);
    }

    fn session_id(&self) -> u64 {
        self.0.session_id.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct NotifierLog {
    pub repaints: usize,
    pub notifications: Vec<String>,
}

pub struct FakeNotifier(pub Arc<Mutex<NotifierLog>>);

impl UiNotifier for FakeNotifier {
    fn repaint(&mut self) {
        self.0.lock().unwrap().repaints += 1;
    }

    fn notify(&mut self, message: &str) {
        self.0.lock().unwrap().notifications.push(message.to_string());
    }
}

// =========================================================================
// Harness
// =========================================================================

/// A temp project plus one of every fake, with shared handles for asserting.
pub struct TestHarness {
    pub dir: TempDir,
    pub config: Config,
    pub server: Arc<FakeServer>,
    pub bootstrap: Arc<FakeBootstrap>,
    pub downloader: Arc<FakeDownloader>,
    pub build_files: Arc<FakeBuildFiles>,
    pub engine: Arc<Mutex<EngineLog>>,
    pub refresher: Arc<Mutex<RefreshLog>>,
    pub host: Arc<HostState>,
    pub notifier: Arc<Mutex<NotifierLog>>,
}

impl TestHarness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Assets")).unwrap();
        std::fs::create_dir_all(dir.path().join("Packages")).unwrap();

        let mut config = Config::default();
        config.project.root = dir.path().to_string_lossy().into_owned();
        config.polling.tick_interval_ms = 50;
        config.polling.status_interval_startup_ms = 50;
        config.polling.status_interval_steady_ms = 100;
        config.polling.heartbeat_timeout_ms = 300;
        config.polling.compile_wait_secs = 1;
        config.polling.recompile_debounce_ms = 100;

        let server = Arc::new(FakeServer::default());
        let bootstrap = Arc::new(FakeBootstrap::new(server.clone()));
        let host = Arc::new(HostState::default());
        host.session_id.store(SESSION_ID, Ordering::SeqCst);

        Self {
            dir,
            config,
            server,
            bootstrap,
            downloader: Arc::new(FakeDownloader::new(1.0)),
            build_files: Arc::new(FakeBuildFiles::default()),
            engine: Arc::new(Mutex::new(EngineLog::default())),
            refresher: Arc::new(Mutex::new(RefreshLog::default())),
            host,
            notifier: Arc::new(Mutex::new(NotifierLog::default())),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.config.project.cache_path().unwrap()
    }

    pub fn patches_file(&self) -> PathBuf {
        self.cache_dir().join("patches.json")
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            server: self.server.clone(),
            bootstrap: self.bootstrap.clone(),
            downloader: self.downloader.clone(),
            build_files: self.build_files.clone(),
            apply_engine: Box::new(FakeApplyEngine(self.engine.clone())),
            refresher: Box::new(FakeRefresher(self.refresher.clone())),
            host: Box::new(FakeHost(self.host.clone())),
            notifier: Box::new(FakeNotifier(self.notifier.clone())),
        }
    }

    pub fn spawn(&self) -> (OrchestratorHandle, JoinHandle<()>) {
        Orchestrator::spawn(&self.config, self.collaborators()).unwrap()
    }

    /// Write a session marker matching the fake host, as a reload would find it.
    pub fn write_current_session(&self) {
        std::fs::create_dir_all(self.cache_dir()).unwrap();
        std::fs::write(
            self.cache_dir().join("session"),
            format!("1\n{}\n{}\n", SESSION_ID, env!("CARGO_PKG_VERSION")),
        )
        .unwrap();
    }

    pub fn write_persisted_patches(&self, patches: &[MethodPatch]) {
        std::fs::create_dir_all(self.cache_dir()).unwrap();
        std::fs::write(self.patches_file(), serde_json::to_vec(patches).unwrap()).unwrap();
    }
}

pub fn patch(method: &str, blob: &[u8]) -> MethodPatch {
    MethodPatch::new(MethodIdentity::new("Game", "Player", method), blob.to_vec())
}

/// Poll snapshots until `condition` holds; panics after five seconds.
pub async fn wait_for_snapshot(
    handle: &OrchestratorHandle,
    condition: impl Fn(&OrchestratorSnapshot) -> bool,
) -> OrchestratorSnapshot {
    let result = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let snapshot = handle.snapshot().await.unwrap();
            if condition(&snapshot) {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    result.expect("condition not reached within 5s")
}

pub async fn wait_for(condition: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("condition not reached within 5s");
}
