//! Server lifecycle state machine.
//!
//! Owned by the event loop; every mutation goes through these methods so no
//! two transitions interleave. Time is passed in so the recency windows can
//! be driven deterministically.

use hp_core::{ServerLifecycleState, StartupProgress};

use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};

/// Result of feeding a health sample into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthTransition {
    Unchanged,
    BecameHealthy,
    BecameUnhealthy,
    /// Was `Running`, health failed; now back in `Starting` until an explicit stop
    ServerDied,
}

#[derive(Debug)]
pub struct LifecycleController {
    state: ServerLifecycleState,
    /// The "recently" window for start/stop/restart
    window: Duration,
    healthy: bool,
    stopping: bool,
    requesting_start: bool,
    requesting_stop: bool,
    requesting_restart: bool,
    requesting_download: bool,
    started_at: Option<Instant>,
    stopped_at: Option<Instant>,
    restarted_at: Option<Instant>,
    startup_progress: Option<StartupProgress>,
    startup_completed_at: Option<Instant>,
}

impl LifecycleController {
    pub fn new(window: Duration) -> Self {
        Self {
            state: ServerLifecycleState::Stopped,
            window,
            healthy: false,
            stopping: false,
            requesting_start: false,
            requesting_stop: false,
            requesting_restart: false,
            requesting_download: false,
            started_at: None,
            stopped_at: None,
            restarted_at: None,
            startup_progress: None,
            startup_completed_at: None,
        }
    }

    // =========================================================================
    // Start
    // =========================================================================

    /// Claim the start guard. False when a start is in flight or one happened
    /// within the recency window.
    pub fn try_begin_start(&mut self, now: Instant) -> bool {
        if self.requesting_start || self.started_recently(now) {
            return false;
        }

        self.requesting_start = true;
        self.stopping = false;
        self.started_at = Some(now);
        self.startup_progress = Some(StartupProgress::initial());
        self.startup_completed_at = None;
        self.set_state(ServerLifecycleState::Starting);
        true
    }

    /// Release the start guard. A failed bootstrap leaves the state at
    /// `Starting` so the caller may retry.
    pub fn finish_start(&mut self, succeeded: bool) {
        self.requesting_start = false;
        if !succeeded {
            warn!("Server bootstrap failed, state left at {}", self.state);
        }
    }

    // =========================================================================
    // Stop
    // =========================================================================

    /// Mark intent to stop. The stopping flag is set even when a stop is
    /// already in flight; only the first caller gets `true` and issues the
    /// actual request.
    pub fn try_begin_stop(&mut self) -> bool {
        self.stopping = true;
        if self.requesting_stop {
            return false;
        }

        self.requesting_stop = true;
        self.set_state(ServerLifecycleState::Stopping);
        true
    }

    pub fn finish_stop(&mut self, now: Instant) {
        self.requesting_stop = false;
        self.stopping = false;
        self.stopped_at = Some(now);
        self.startup_progress = None;
        self.startup_completed_at = None;

        let next = if self.requesting_restart {
            ServerLifecycleState::Restarting
        } else {
            ServerLifecycleState::Stopped
        };
        self.set_state(next);
    }

    // =========================================================================
    // Restart / download
    // =========================================================================

    pub fn try_begin_restart(&mut self) -> bool {
        if self.requesting_restart {
            return false;
        }
        self.requesting_restart = true;
        true
    }

    /// A restart whose start half was refused ends in `Stopped`.
    pub fn finish_restart(&mut self, now: Instant) {
        self.requesting_restart = false;
        self.restarted_at = Some(now);
        if self.state == ServerLifecycleState::Restarting {
            self.set_state(ServerLifecycleState::Stopped);
        }
    }

    pub fn try_begin_download(&mut self) -> bool {
        if self.requesting_download {
            return false;
        }
        self.requesting_download = true;
        true
    }

    pub fn enter_downloading(&mut self) {
        self.set_state(ServerLifecycleState::Downloading);
    }

    /// Release the download guard. A declined or failed download returns a
    /// waiting state to `Stopped`.
    pub fn finish_download(&mut self, proceed: bool) {
        self.requesting_download = false;
        if !proceed
            && matches!(
                self.state,
                ServerLifecycleState::Downloading | ServerLifecycleState::Restarting
            )
        {
            self.set_state(ServerLifecycleState::Stopped);
        }
    }

    // =========================================================================
    // Health / progress
    // =========================================================================

    pub fn observe_health(&mut self, healthy: bool, now: Instant) -> HealthTransition {
        let was_healthy = self.healthy;
        self.healthy = healthy;

        if !healthy {
            self.startup_completed_at = None;
            if !self.started_recently(now) {
                self.startup_progress = None;
            }
        }

        match (was_healthy, healthy) {
            (false, true) => HealthTransition::BecameHealthy,
            (true, false) if self.state == ServerLifecycleState::Running => {
                warn!("Patch server stopped responding while running");
                self.set_state(ServerLifecycleState::Starting);
                HealthTransition::ServerDied
            }
            (true, false) => HealthTransition::BecameUnhealthy,
            _ => HealthTransition::Unchanged,
        }
    }

    /// Record the server-reported boot progress. Returns true when fraction or
    /// text differ from the previous value.
    pub fn observe_progress(
        &mut self,
        progress: StartupProgress,
        download_complete: bool,
        now: Instant,
    ) -> bool {
        let changed = self.startup_progress.as_ref() != Some(&progress);

        if progress.is_complete() && self.startup_completed_at.is_none() {
            self.startup_completed_at = Some(now);
        }
        self.startup_progress = Some(progress);

        // A server left running by a previous session is adopted from Stopped.
        let may_run = match self.state {
            ServerLifecycleState::Starting => true,
            ServerLifecycleState::Stopped => !self.stopped_recently(now),
            _ => false,
        };
        if may_run && self.started(download_complete) {
            self.set_state(ServerLifecycleState::Running);
        }

        changed
    }

    // =========================================================================
    // Predicates
    // =========================================================================

    /// Healthy, binary downloaded and server reports full startup progress.
    pub fn started(&self, download_complete: bool) -> bool {
        self.healthy
            && download_complete
            && self
                .startup_progress
                .as_ref()
                .is_some_and(StartupProgress::is_complete)
    }

    pub fn starting(&self) -> bool {
        self.requesting_start || self.state == ServerLifecycleState::Starting
    }

    pub fn stopping(&self) -> bool {
        self.stopping
    }

    pub fn started_recently(&self, now: Instant) -> bool {
        self.within_window(self.started_at, now)
    }

    pub fn stopped_recently(&self, now: Instant) -> bool {
        self.within_window(self.stopped_at, now)
    }

    pub fn restarted_recently(&self, now: Instant) -> bool {
        self.within_window(self.restarted_at, now)
    }

    fn within_window(&self, at: Option<Instant>, now: Instant) -> bool {
        at.is_some_and(|at| now.saturating_duration_since(at) < self.window)
    }

    pub fn state(&self) -> ServerLifecycleState {
        self.state
    }

    pub fn healthy(&self) -> bool {
        self.healthy
    }

    pub fn startup_progress(&self) -> Option<&StartupProgress> {
        self.startup_progress.as_ref()
    }

    pub fn startup_completed_at(&self) -> Option<Instant> {
        self.startup_completed_at
    }

    fn set_state(&mut self, next: ServerLifecycleState) {
        if self.state != next {
            info!("Server lifecycle: {} -> {}", self.state, next);
            self.state = next;
        }
    }
}
