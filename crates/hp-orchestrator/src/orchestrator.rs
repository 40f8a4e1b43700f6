//! Single-owner event loop.
//!
//! All orchestrator state lives in [`Orchestrator`] and is only touched by
//! the loop task. A ticker task and short-lived background tasks do the
//! network and prompt work, then report back over the event channel.

use crate::build_info::BuildInfoThrottle;
use crate::event::{Command, Event};
use crate::health::HealthPoller;
use crate::lifecycle::{HealthTransition, LifecycleController};
use crate::patch_poller::{PatchApplier, StatusTransition};
use crate::recompile::{
    RECOMPILE_NOTIFICATION, RecompileContext, RecompileDecision, RecompileOrchestrator,
};
use crate::storage::{
    InstanceLock, PATCHES_FILENAME, PatchStore, SESSION_FILENAME, SessionMarker,
    load_patches,
};
use crate::{OrchestratorError, OrchestratorResult, OrchestratorSnapshot};

use hp_config::Config;
use hp_core::{
    ApplyEngine, AssetRefresher, BuildFileGenerator, ChangeClassifier, ChangeEvent, ChangeKind,
    CoreError, CoreResult, Failure, Failures, HostEnvironment, LoginData, LoginStatus,
    MethodPatchResponse, PatchServer, PatchStatus, ServerBootstrap, ServerDownloader, UiNotifier,
};

use std::future::Future;
use std::panic::Location;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use error_location::ErrorLocation;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

const COMMAND_CHANNEL_CAPACITY: usize = 32;

/// Everything the orchestrator talks to but does not own.
pub struct Collaborators {
    pub server: Arc<dyn PatchServer>,
    pub bootstrap: Arc<dyn ServerBootstrap>,
    pub downloader: Arc<dyn ServerDownloader>,
    pub build_files: Arc<dyn BuildFileGenerator>,
    pub apply_engine: Box<dyn ApplyEngine>,
    pub refresher: Box<dyn AssetRefresher>,
    pub host: Box<dyn HostEnvironment>,
    pub notifier: Box<dyn UiNotifier>,
}

/// Cloneable front door to a running orchestrator.
#[derive(Clone)]
pub struct OrchestratorHandle {
    tx: mpsc::Sender<Command>,
}

impl OrchestratorHandle {
    async fn send(&self, command: Command) -> OrchestratorResult<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| OrchestratorError::channel_closed())
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> OrchestratorResult<T> {
        let (reply, rx) = oneshot::channel();
        self.send(make(reply)).await?;
        rx.await.map_err(|_| OrchestratorError::channel_closed())
    }

    /// Start the server. False when a start is already in flight, one
    /// happened recently, or the bootstrap failed.
    pub async fn start(&self, login: Option<LoginData>) -> OrchestratorResult<bool> {
        self.request(|reply| Command::Start { login, reply }).await
    }

    pub async fn stop(&self) -> OrchestratorResult<()> {
        self.request(|reply| Command::Stop { reply }).await
    }

    pub async fn restart(&self) -> OrchestratorResult<()> {
        self.request(|reply| Command::Restart { reply }).await
    }

    /// Download the server if needed (asking for consent), then start it.
    pub async fn download_and_run(&self, login: Option<LoginData>) -> OrchestratorResult<bool> {
        self.request(|reply| Command::DownloadAndRun { login, reply })
            .await
    }

    pub async fn compilation_finished(&self) -> OrchestratorResult<()> {
        self.send(Command::CompilationFinished).await
    }

    pub async fn focus_changed(&self, focused: bool) -> OrchestratorResult<()> {
        self.send(Command::FocusChanged { focused }).await
    }

    /// Feed a file-system change observed by the host.
    pub async fn file_changed(&self, event: ChangeEvent) -> OrchestratorResult<()> {
        self.send(Command::FileChanged(event)).await
    }

    pub async fn reset_failures(&self) -> OrchestratorResult<()> {
        self.send(Command::ResetFailures).await
    }

    pub async fn snapshot(&self) -> OrchestratorResult<OrchestratorSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Stop the loop, flush the patch store and release the instance lock.
    pub async fn shutdown(&self) -> OrchestratorResult<()> {
        self.request(|reply| Command::Shutdown { reply }).await
    }
}

pub struct Orchestrator {
    config: Config,
    collab: Collaborators,
    classifier: ChangeClassifier,
    lifecycle: LifecycleController,
    health: HealthPoller,
    patches: PatchApplier,
    recompile: RecompileOrchestrator,
    build_info: BuildInfoThrottle,
    failures: Failures,
    login_status: Option<LoginStatus>,
    pending_update_prompt: Option<String>,
    store: PatchStore,
    _lock: InstanceLock,
    events_tx: mpsc::UnboundedSender<Event>,
}

impl Orchestrator {
    /// Build the orchestrator and start its loop. Must be called inside a
    /// Tokio runtime.
    ///
    /// On a fresh launch a stale patch file is deleted; after a reload the
    /// persisted patches are re-applied before the first tick.
    pub fn spawn(
        config: &Config,
        collaborators: Collaborators,
    ) -> OrchestratorResult<(OrchestratorHandle, JoinHandle<()>)> {
        config.log_summary();
        let root = config.project.root_path()?;
        let source_roots = config.project.source_root_paths()?;
        let cache_dir = config.project.cache_path()?;
        std::fs::create_dir_all(&cache_dir).map_err(|e| OrchestratorError::DirCreation {
            path: cache_dir.clone(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        let version = env!("CARGO_PKG_VERSION");
        let lock = InstanceLock::acquire(&cache_dir, version)?;
        debug!("Acquired {}", lock.path().display());

        let marker = SessionMarker::new(collaborators.host.session_id(), version);
        let session = marker.check_and_update(&cache_dir.join(SESSION_FILENAME))?;

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (tx, commands_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let polling = &config.polling;

        let mut orchestrator = Self {
            config: config.clone(),
            collab: collaborators,
            classifier: ChangeClassifier::new(root, &source_roots),
            lifecycle: LifecycleController::new(polling.heartbeat_timeout()),
            health: HealthPoller::new(
                polling.status_interval_startup(),
                polling.status_interval_steady(),
            ),
            patches: PatchApplier::new(),
            recompile: RecompileOrchestrator::new(
                polling.recompile_debounce(),
                polling.compile_wait(),
            ),
            build_info: BuildInfoThrottle::new(polling.prepare_build_info_interval()),
            failures: Failures::new(),
            login_status: None,
            pending_update_prompt: session.updated_from,
            store: PatchStore::spawn(cache_dir.join(PATCHES_FILENAME)),
            _lock: lock,
            events_tx,
        };

        if session.fresh_launch {
            orchestrator.discard_stale_patches();
        } else {
            orchestrator.reapply_persisted_patches();
        }

        let join = tokio::spawn(orchestrator.run(commands_rx, events_rx));
        Ok((OrchestratorHandle { tx }, join))
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut events: mpsc::UnboundedReceiver<Event>,
    ) {
        let ticker = spawn_ticker(self.events_tx.clone(), self.config.polling.tick_interval());
        info!("Orchestrator loop started");

        let mut shutdown_reply = None;
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Shutdown { reply }) => {
                        shutdown_reply = Some(reply);
                        break;
                    }
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(event) = events.recv() => self.handle_event(event),
            }
        }

        ticker.abort();
        self.store.close().await;
        info!("Orchestrator loop stopped");

        if let Some(reply) = shutdown_reply {
            reply.send(()).ok();
        }
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    fn handle_command(&mut self, command: Command) {
        let now = Instant::now();
        match command {
            Command::Start { login, reply } => self.begin_start(login, reply),
            Command::Stop { reply } => self.begin_stop(reply),
            Command::Restart { reply } => self.begin_restart(reply),
            Command::DownloadAndRun { login, reply } => self.begin_download_and_run(login, reply),
            Command::CompilationFinished => self.on_compilation_finished(now),
            Command::FocusChanged { focused } => {
                if focused && !self.config.patching.recompile_immediately {
                    self.try_recompile_unsupported_changes(now);
                }
            }
            Command::FileChanged(event) => self.handle_change(&event, now),
            Command::ResetFailures => {
                self.failures.clear();
                self.collab.notifier.repaint();
            }
            Command::Snapshot { reply } => {
                reply.send(self.snapshot(now)).ok();
            }
            Command::Shutdown { reply } => {
                warn!("Shutdown can only be requested through the handle");
                reply.send(()).ok();
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        let now = Instant::now();
        match event {
            Event::Tick => self.on_tick(),
            Event::HealthChecked { healthy } => self.on_health_checked(healthy, now),
            Event::StatusFetched(result) => self.on_status_fetched(result, now),
            Event::PatchesPolled(result) => self.on_patches_polled(result, now),
            Event::PatchStatusPolled(result) => self.on_patch_status_polled(result),
            Event::AssetChangesPolled(result) => self.on_asset_changes_polled(result, now),
            Event::StartFinished { result, reply } => {
                if let Err(e) = &result {
                    error!("Failed to start patch server: {e}");
                }
                self.lifecycle.finish_start(result.is_ok());
                reply.send(result.is_ok()).ok();
            }
            Event::StopFinished { result, reply } => {
                if let Err(e) = &result {
                    warn!("Patch server stop reported an error: {e}");
                }
                self.lifecycle.finish_stop(now);
                info!("Patch server stopped");
                self.collab.notifier.repaint();
                reply.send(()).ok();
            }
            Event::DownloadFinished {
                proceed,
                login,
                reply,
            } => {
                self.lifecycle.finish_download(proceed);
                if proceed {
                    self.begin_start(login, reply);
                } else {
                    reply.send(false).ok();
                }
            }
            Event::RestartFinished { reply } => {
                self.lifecycle.finish_restart(now);
                info!("Patch server restart finished");
                reply.send(()).ok();
            }
            Event::CompileRequested(result) => {
                if let Err(e) = result {
                    log_poll_error("compile request", &e);
                }
            }
            Event::BuildInfoPrepared(result) => {
                if let Err(e) = result {
                    log_poll_error("prepare build info", &e);
                }
            }
            Event::UpdatePromptAnswered { restart } => {
                if restart {
                    info!("Restarting patch server after update");
                    let (reply, _) = oneshot::channel();
                    self.begin_restart(reply);
                }
            }
            Event::Internal(command) => self.handle_command(command),
        }
    }

    fn spawn_task<F>(&self, task: F)
    where
        F: Future<Output = Event> + Send + 'static,
    {
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let event = task.await;
            tx.send(event).ok();
        });
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    fn download_complete(&self) -> bool {
        self.collab.downloader.progress() >= 1.0
    }

    fn begin_start(&mut self, login: Option<LoginData>, reply: oneshot::Sender<bool>) {
        if !self.lifecycle.try_begin_start(Instant::now()) {
            debug!("Start ignored: already in flight or started recently");
            reply.send(false).ok();
            return;
        }

        info!("Starting patch server");
        self.collab.apply_engine.clear_patched_methods();
        self.patches.clear();
        self.health.invalidate_status();

        let bootstrap = self.collab.bootstrap.clone();
        self.spawn_task(async move {
            let result = bootstrap.start(login).await;
            Event::StartFinished { result, reply }
        });
    }

    fn begin_stop(&mut self, reply: oneshot::Sender<()>) {
        if !self.lifecycle.try_begin_stop() {
            debug!("Stop already in flight");
            reply.send(()).ok();
            return;
        }

        info!("Stopping patch server");
        self.collab.apply_engine.clear_patched_methods();
        self.patches.clear();

        let bootstrap = self.collab.bootstrap.clone();
        self.spawn_task(async move {
            let result = bootstrap.stop().await;
            Event::StopFinished { result, reply }
        });
    }

    /// Stop, then download-and-run, as two commands issued from a background
    /// task so the loop stays free while each half completes.
    fn begin_restart(&mut self, reply: oneshot::Sender<()>) {
        if !self.lifecycle.try_begin_restart() {
            debug!("Restart already in flight");
            reply.send(()).ok();
            return;
        }

        info!("Restarting patch server");
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let (stop_reply, stopped) = oneshot::channel();
            if tx
                .send(Event::Internal(Command::Stop { reply: stop_reply }))
                .is_err()
            {
                return;
            }
            stopped.await.ok();

            let (run_reply, ran) = oneshot::channel();
            if tx
                .send(Event::Internal(Command::DownloadAndRun {
                    login: None,
                    reply: run_reply,
                }))
                .is_err()
            {
                return;
            }
            ran.await.ok();

            tx.send(Event::RestartFinished { reply }).ok();
        });
    }

    fn begin_download_and_run(&mut self, login: Option<LoginData>, reply: oneshot::Sender<bool>) {
        if !self.lifecycle.try_begin_download() {
            debug!("Download-and-run already in flight");
            reply.send(false).ok();
            return;
        }

        if self.download_complete() {
            self.lifecycle.finish_download(true);
            self.begin_start(login, reply);
            return;
        }

        self.lifecycle.enter_downloading();
        let downloader = self.collab.downloader.clone();
        self.spawn_task(async move {
            let proceed = if downloader.confirm_download().await {
                match downloader.download().await {
                    Ok(()) => true,
                    Err(e) => {
                        error!("Patch server download failed: {e}");
                        false
                    }
                }
            } else {
                info!("Patch server download declined");
                false
            };
            Event::DownloadFinished {
                proceed,
                login,
                reply,
            }
        });
    }

    // =========================================================================
    // Health & status
    // =========================================================================

    fn on_tick(&mut self) {
        if !self.health.try_begin_check() {
            return;
        }
        let server = self.collab.server.clone();
        self.spawn_task(async move {
            Event::HealthChecked {
                healthy: server.check_health().await,
            }
        });
    }

    fn on_health_checked(&mut self, healthy: bool, now: Instant) {
        self.health.finish_check();

        match self.lifecycle.observe_health(healthy, now) {
            HealthTransition::BecameHealthy => {
                info!("Patch server is reachable");
                self.collab.notifier.repaint();
                self.health.invalidate_status();
                self.build_info.request();
                if let Some(previous) = self.pending_update_prompt.take() {
                    self.prompt_restart_after_update(previous);
                }
            }
            HealthTransition::BecameUnhealthy | HealthTransition::ServerDied => {
                info!("Patch server is unreachable");
                self.collab.notifier.repaint();
            }
            HealthTransition::Unchanged => {}
        }

        if !healthy {
            return;
        }

        let booting = self.lifecycle.starting()
            || self.lifecycle.started_recently(now)
            || self.lifecycle.startup_completed_at().is_none();
        if self.health.try_begin_status_fetch(now, booting) {
            let server = self.collab.server.clone();
            self.spawn_task(async move { Event::StatusFetched(server.login_status().await) });
        }

        if self.build_info.take_due(now) {
            let server = self.collab.server.clone();
            self.spawn_task(async move {
                Event::BuildInfoPrepared(server.prepare_build_info().await)
            });
        }

        self.poll_patch_side();
    }

    fn on_status_fetched(&mut self, result: CoreResult<LoginStatus>, now: Instant) {
        self.health.finish_status_fetch();

        let status = match result {
            Ok(status) => status,
            Err(e) => {
                log_poll_error("status", &e);
                return;
            }
        };

        let download_complete = self.download_complete();
        let progress_changed =
            self.lifecycle
                .observe_progress(status.progress(), download_complete, now);
        let session_changed = self
            .login_status
            .as_ref()
            .is_some_and(|previous| previous.session_changed(&status));
        if progress_changed || session_changed {
            self.build_info.request();
            self.collab.notifier.repaint();
        }
        self.login_status = Some(status);
    }

    fn prompt_restart_after_update(&self, previous: String) {
        let downloader = self.collab.downloader.clone();
        self.spawn_task(async move {
            Event::UpdatePromptAnswered {
                restart: downloader.confirm_restart_after_update(&previous).await,
            }
        });
    }

    // =========================================================================
    // Patch polling
    // =========================================================================

    fn poll_patch_side(&mut self) {
        if self.patches.try_begin_patch_poll() {
            let server = self.collab.server.clone();
            self.spawn_task(async move { Event::PatchesPolled(server.poll_method_patches().await) });
        }

        if self.patches.try_begin_status_poll() {
            let server = self.collab.server.clone();
            let current = self.patches.patch_status();
            self.spawn_task(async move {
                Event::PatchStatusPolled(server.poll_patch_status(current).await)
            });
        }

        if self.config.patching.all_asset_changes && self.patches.try_begin_asset_poll() {
            let server = self.collab.server.clone();
            self.spawn_task(async move {
                Event::AssetChangesPolled(server.poll_asset_changes().await)
            });
        }
    }

    fn on_patches_polled(&mut self, result: CoreResult<MethodPatchResponse>, now: Instant) {
        self.patches.finish_patch_poll();
        match result {
            Ok(response) if response.is_empty() => {}
            Ok(response) => self.handle_patch_response(response, now),
            Err(e) => log_poll_error("patches", &e),
        }
    }

    fn handle_patch_response(&mut self, response: MethodPatchResponse, now: Instant) {
        let engine = self.collab.apply_engine.as_mut();
        let mut table_changed = false;

        if !response.patches.is_empty() {
            let outcome = self
                .patches
                .apply_batch(engine, &response.patches, &mut self.failures);
            table_changed |= outcome.applied > 0;
        }

        if !response.removed_methods.is_empty() {
            self.patches.remove_methods(engine, &response.removed_methods);
            table_changed = true;
        }

        if table_changed {
            self.store.save(self.patches.applied_patches());
        }

        let had_compile_error = self.failures.has_compile_error();
        let outcome = self.failures.apply_compile_batch(
            &response.failures,
            &self.config.patching.compile_error_marker,
        );
        if outcome.fatal > 0 {
            warn!(
                "{} compile error(s) reported, hot patching halted until the next successful compile",
                outcome.fatal
            );
        } else if had_compile_error {
            info!("Compile errors resolved");
        }

        self.collab.notifier.repaint();

        if outcome.non_fatal > 0
            && (self.config.patching.recompile_immediately || self.collab.host.has_focus())
        {
            self.try_recompile_unsupported_changes(now);
        }
    }

    fn on_patch_status_polled(&mut self, result: CoreResult<PatchStatus>) {
        self.patches.finish_status_poll();
        match result {
            Ok(status) => match self.patches.observe_status(status) {
                StatusTransition::EnteredCompiling => self.recompile.clear_waiting(),
                StatusTransition::EnteredPatching => self.collab.notifier.repaint(),
                StatusTransition::Other | StatusTransition::Unchanged => {}
            },
            Err(e) => log_poll_error("patch status", &e),
        }
    }

    fn on_asset_changes_polled(&mut self, result: CoreResult<Vec<String>>, now: Instant) {
        self.patches.finish_asset_poll();
        let paths = match result {
            Ok(paths) => paths,
            Err(e) => {
                log_poll_error("asset changes", &e);
                return;
            }
        };

        for path in paths {
            let event = ChangeEvent::observe(&self.classifier.project_root().join(path));
            self.handle_change(&event, now);
        }
    }

    fn reapply_persisted_patches(&mut self) {
        let path = self.store.path().to_path_buf();
        let patches = match load_patches(&path) {
            Ok(patches) => patches,
            Err(e) => {
                warn!("Ignoring persisted patches: {e}");
                return;
            }
        };
        if patches.is_empty() {
            return;
        }

        let outcome = self.patches.apply_batch(
            self.collab.apply_engine.as_mut(),
            &patches,
            &mut self.failures,
        );
        info!(
            "Reapplied {} persisted patches after reload ({} failed)",
            outcome.applied, outcome.failed
        );
    }

    fn discard_stale_patches(&self) {
        let path = self.store.path();
        match std::fs::remove_file(path) {
            Ok(()) => info!("Deleted stale patches from a previous session"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to delete {}: {e}", path.display()),
        }
    }

    // =========================================================================
    // Changes & recompile
    // =========================================================================

    fn handle_change(&mut self, event: &ChangeEvent, now: Instant) {
        let classification = self.classifier.classify(event);
        match classification.kind {
            ChangeKind::UnsupportedRequiresRecompile(change) => {
                let path = display_relative(&event.path, self.classifier.project_root());
                info!("Unsupported change ({}) in {}", change.as_str(), path);
                self.failures.record(Failure::unsupported_edit(change, &path));
                self.collab.notifier.repaint();

                if self.config.patching.recompile_immediately || self.collab.host.has_focus() {
                    self.try_recompile_unsupported_changes(now);
                }
            }
            ChangeKind::HotPatchable { relative_path } => {
                let result = if event.exists {
                    self.collab.refresher.reimport(&relative_path)
                } else {
                    self.collab.refresher.delete(&relative_path)
                };
                if let Err(e) = result {
                    warn!("Asset refresh failed: {e}");
                }
            }
            ChangeKind::Ignored => debug!("Ignoring change to {}", event.path.display()),
        }
    }

    fn try_recompile_unsupported_changes(&mut self, now: Instant) {
        let patching = &self.config.patching;
        let ctx = RecompileContext {
            enabled: patching.auto_recompile_unsupported_changes,
            has_unsupported_changes: self.failures.has_unsupported_changes(),
            has_compile_error: self.failures.has_compile_error(),
            patch_status: self.patches.patch_status(),
            host_is_live: self.collab.host.is_live(),
            allow_in_live_mode: patching.recompile_in_live_mode,
        };

        match self.recompile.decide(now, ctx) {
            RecompileDecision::Fire { exit_live_mode } => {
                if exit_live_mode {
                    self.collab.host.exit_live_mode();
                }
                info!("Recompiling to pick up unsupported changes");
                self.collab.notifier.notify(RECOMPILE_NOTIFICATION);
                self.collab.host.request_recompile();
            }
            RecompileDecision::Skip(reason) => debug!("Recompile skipped: {:?}", reason),
        }
    }

    fn on_compilation_finished(&mut self, now: Instant) {
        info!("Compilation finished");
        self.failures.clear();
        self.patches.clear();

        if self.lifecycle.healthy() {
            self.recompile.start_waiting(now);
            self.patches.reset_first_patch_attempted();
            self.request_compile();
        }

        self.store.delete();
        self.collab.notifier.repaint();
    }

    /// Discard server-side patches, regenerate build files, then compile.
    fn request_compile(&self) {
        let server = self.collab.server.clone();
        let build_files = self.collab.build_files.clone();
        self.spawn_task(async move {
            let result = async {
                server.clear_patches().await?;
                build_files.generate().await?;
                server.request_compile().await
            }
            .await;
            Event::CompileRequested(result)
        });
    }

    // =========================================================================
    // Snapshot
    // =========================================================================

    fn snapshot(&self, now: Instant) -> OrchestratorSnapshot {
        let download_progress = self.collab.downloader.progress();
        let patch_status = self.patches.patch_status();

        OrchestratorSnapshot {
            state: self.lifecycle.state(),
            healthy: self.lifecycle.healthy(),
            started: self.lifecycle.started(download_progress >= 1.0),
            starting: self.lifecycle.starting(),
            stopping: self.lifecycle.stopping(),
            compiling: self.recompile.compiling(now, patch_status),
            started_recently: self.lifecycle.started_recently(now),
            stopped_recently: self.lifecycle.stopped_recently(now),
            restarted_recently: self.lifecycle.restarted_recently(now),
            download_progress,
            startup_progress: self.lifecycle.startup_progress().cloned(),
            startup_completed: self.lifecycle.startup_completed_at().is_some(),
            patch_status,
            first_patch_attempted: self.patches.first_patch_attempted(),
            failures: self.failures.iter().cloned().collect(),
            compile_error: self.failures.has_compile_error(),
            applied_patches: self.patches.applied_count(),
            login_status: self.login_status.clone(),
        }
    }
}

fn spawn_ticker(tx: mpsc::UnboundedSender<Event>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if tx.send(Event::Tick).is_err() {
                break;
            }
        }
    })
}

/// Transport errors are routine while the server is down.
fn log_poll_error(what: &str, e: &CoreError) {
    if e.is_transport() {
        debug!("{what} poll failed: {e}");
    } else {
        warn!("{what} poll failed: {e}");
    }
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
