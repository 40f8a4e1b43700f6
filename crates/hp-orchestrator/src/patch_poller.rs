//! Patch application and bookkeeping for the patch poller.

use hp_core::{
    ApplyEngine, CoreError, Failure, Failures, MethodIdentity, MethodPatch, PatchStatus,
};

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

/// What changed when a new patch status was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTransition {
    Unchanged,
    EnteredCompiling,
    EnteredPatching,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub applied: usize,
    pub failed: usize,
    /// Compiler diagnostics shipped alongside the patches, logged at `warn`.
    pub diagnostics: usize,
}

/// Applied-method table plus the patch status mirror.
///
/// The table holds one entry per method identity; a later patch for the same
/// identity replaces the earlier one.
#[derive(Debug, Default)]
pub struct PatchApplier {
    applied: BTreeMap<MethodIdentity, MethodPatch>,
    patch_status: PatchStatus,
    first_patch_attempted: bool,
    patches_in_flight: bool,
    status_in_flight: bool,
    assets_in_flight: bool,
}

impl PatchApplier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply every patch in the batch. A failing patch is recorded and does
    /// not stop the rest.
    pub fn apply_batch(
        &mut self,
        engine: &mut dyn ApplyEngine,
        patches: &[MethodPatch],
        failures: &mut Failures,
    ) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::default();

        for patch in patches {
            for diagnostic in &patch.diagnostics {
                warn!("{}: {}", patch.identity, diagnostic);
            }
            outcome.diagnostics += patch.diagnostics.len();

            let handle = match engine.resolve(&patch.identity) {
                Ok(handle) => handle,
                Err(e) => {
                    warn!("Failed to resolve {}: {}", patch.identity, e);
                    failures.record(Failure::apply_error(e.summary()));
                    outcome.failed += 1;
                    continue;
                }
            };

            let errors = engine.apply(handle, &patch.new_implementation);
            if errors.is_empty() {
                debug!("Applied patch to {}", patch.identity);
                self.applied.insert(patch.identity.clone(), patch.clone());
                outcome.applied += 1;
            } else {
                for message in errors {
                    let e = CoreError::apply(&patch.identity, message);
                    warn!("{e}");
                    failures.record(Failure::apply_error(e.summary()));
                }
                outcome.failed += 1;
            }
        }

        if outcome.applied > 0 || outcome.failed > 0 {
            info!(
                "Patch batch: {} applied, {} failed",
                outcome.applied, outcome.failed
            );
        }
        outcome
    }

    /// Remove methods the server reports as deleted. Errors are logged only.
    pub fn remove_methods(&mut self, engine: &mut dyn ApplyEngine, identities: &[MethodIdentity]) {
        for identity in identities {
            self.applied.remove(identity);
            let result = engine
                .resolve(identity)
                .and_then(|handle| engine.remove(handle));
            if let Err(e) = result {
                warn!("Failed to remove method {}: {}", identity, e);
            }
        }
    }

    pub fn observe_status(&mut self, status: PatchStatus) -> StatusTransition {
        if status == self.patch_status {
            return StatusTransition::Unchanged;
        }
        self.patch_status = status;

        match status {
            PatchStatus::Compiling => StatusTransition::EnteredCompiling,
            PatchStatus::Patching => {
                self.first_patch_attempted = true;
                StatusTransition::EnteredPatching
            }
            _ => StatusTransition::Other,
        }
    }

    /// Snapshot of the applied table in identity order, for persistence.
    pub fn applied_patches(&self) -> Vec<MethodPatch> {
        self.applied.values().cloned().collect()
    }

    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    pub fn applied(&self, identity: &MethodIdentity) -> Option<&MethodPatch> {
        self.applied.get(identity)
    }

    pub fn clear(&mut self) {
        self.applied.clear();
    }

    pub fn patch_status(&self) -> PatchStatus {
        self.patch_status
    }

    pub fn first_patch_attempted(&self) -> bool {
        self.first_patch_attempted
    }

    pub fn reset_first_patch_attempted(&mut self) {
        self.first_patch_attempted = false;
    }

    // =========================================================================
    // In-flight guards for the three patch-side polls
    // =========================================================================

    pub fn try_begin_patch_poll(&mut self) -> bool {
        !std::mem::replace(&mut self.patches_in_flight, true)
    }

    pub fn finish_patch_poll(&mut self) {
        self.patches_in_flight = false;
    }

    pub fn try_begin_status_poll(&mut self) -> bool {
        !std::mem::replace(&mut self.status_in_flight, true)
    }

    pub fn finish_status_poll(&mut self) {
        self.status_in_flight = false;
    }

    pub fn try_begin_asset_poll(&mut self) -> bool {
        !std::mem::replace(&mut self.assets_in_flight, true)
    }

    pub fn finish_asset_poll(&mut self) {
        self.assets_in_flight = false;
    }
}
