mod storage;

use hp_core::{ApplyEngine, CoreError, CoreResult, MethodHandle, MethodIdentity, MethodPatch};

use std::collections::HashMap;

/// In-memory apply engine; identities listed in `unresolvable` fail to
/// resolve and blobs equal to `[0xFF]` fail to apply.
#[derive(Default)]
pub(crate) struct RecordingEngine {
    pub handles: HashMap<MethodIdentity, MethodHandle>,
    pub applied: Vec<(MethodHandle, Vec<u8>)>,
    pub removed: Vec<MethodHandle>,
    pub unresolvable: Vec<MethodIdentity>,
    pub cleared: usize,
}

impl ApplyEngine for RecordingEngine {
    fn resolve(&mut self, identity: &MethodIdentity) -> CoreResult<MethodHandle> {
        if self.unresolvable.contains(identity) {
            return Err(CoreError::resolve(identity, "method not found"));
        }
        let next = MethodHandle(self.handles.len() as u64);
        Ok(*self.handles.entry(identity.clone()).or_insert(next))
    }

    fn apply(&mut self, handle: MethodHandle, blob: &[u8]) -> Vec<String> {
        if blob == [0xFF] {
            return vec!["invalid IL".to_string()];
        }
        self.applied.push((handle, blob.to_vec()));
        Vec::new()
    }

    fn remove(&mut self, handle: MethodHandle) -> CoreResult<()> {
        self.removed.push(handle);
        Ok(())
    }

    fn clear_patched_methods(&mut self) {
        self.cleared += 1;
    }
}

pub(crate) fn patch(method: &str, blob: &[u8]) -> MethodPatch {
    MethodPatch::new(MethodIdentity::new("Game", "Player", method), blob.to_vec())
}
