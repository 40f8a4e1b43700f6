//! Debounced full-recompile trigger.

use hp_core::PatchStatus;

use std::time::Duration;

use tokio::time::Instant;

pub const RECOMPILE_NOTIFICATION: &str = "Unsupported changes detected! Recompiling...";

/// Inputs to one recompile decision, gathered by the event loop.
#[derive(Debug, Clone, Copy)]
pub struct RecompileContext {
    pub enabled: bool,
    pub has_unsupported_changes: bool,
    pub has_compile_error: bool,
    pub patch_status: PatchStatus,
    pub host_is_live: bool,
    pub allow_in_live_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    NothingToRecompile,
    CompileError,
    Compiling,
    LiveMode,
    Debounced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecompileDecision {
    Fire { exit_live_mode: bool },
    Skip(SkipReason),
}

#[derive(Debug)]
pub struct RecompileOrchestrator {
    debounce: Duration,
    compile_wait: Duration,
    last_fired: Option<Instant>,
    waiting_since: Option<Instant>,
}

impl RecompileOrchestrator {
    pub fn new(debounce: Duration, compile_wait: Duration) -> Self {
        Self {
            debounce,
            compile_wait,
            last_fired: None,
            waiting_since: None,
        }
    }

    /// Decide whether an unsupported-change recompile may fire now. Firing
    /// records the time for the debounce window.
    pub fn decide(&mut self, now: Instant, ctx: RecompileContext) -> RecompileDecision {
        let skip = if !ctx.enabled {
            Some(SkipReason::Disabled)
        } else if !ctx.has_unsupported_changes {
            Some(SkipReason::NothingToRecompile)
        } else if ctx.has_compile_error {
            Some(SkipReason::CompileError)
        } else if self.compiling(now, ctx.patch_status) {
            Some(SkipReason::Compiling)
        } else if ctx.host_is_live && !ctx.allow_in_live_mode {
            Some(SkipReason::LiveMode)
        } else if self
            .last_fired
            .is_some_and(|at| now.saturating_duration_since(at) < self.debounce)
        {
            Some(SkipReason::Debounced)
        } else {
            None
        };

        match skip {
            Some(reason) => RecompileDecision::Skip(reason),
            None => {
                self.last_fired = Some(now);
                RecompileDecision::Fire {
                    exit_live_mode: ctx.host_is_live,
                }
            }
        }
    }

    /// Within the wait window after a compile request, or the server says so.
    pub fn compiling(&self, now: Instant, patch_status: PatchStatus) -> bool {
        let waiting = self
            .waiting_since
            .is_some_and(|at| now.saturating_duration_since(at) < self.compile_wait);
        waiting || patch_status == PatchStatus::Compiling
    }

    pub fn start_waiting(&mut self, now: Instant) {
        self.waiting_since = Some(now);
    }

    /// The server has picked up the compile; its own status takes over.
    pub fn clear_waiting(&mut self) {
        self.waiting_since = None;
    }
}
