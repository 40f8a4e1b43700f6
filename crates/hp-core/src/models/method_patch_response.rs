use crate::{MethodIdentity, MethodPatch};

use serde::{Deserialize, Serialize};

/// One poll result from the server: new patches, compile failures, removed methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodPatchResponse {
    #[serde(default)]
    pub patches: Vec<MethodPatch>,
    #[serde(default)]
    pub failures: Vec<String>,
    #[serde(default)]
    pub removed_methods: Vec<MethodIdentity>,
}

impl MethodPatchResponse {
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty() && self.failures.is_empty() && self.removed_methods.is_empty()
    }
}
