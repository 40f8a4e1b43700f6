use crate::MethodIdentity;

use serde::{Deserialize, Serialize};

/// A compiled replacement for one method body.
///
/// Immutable once received. The applied table is keyed by `identity`, so
/// receiving the same identity again replaces the earlier blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodPatch {
    pub identity: MethodIdentity,
    #[serde(with = "crate::models::blob")]
    pub new_implementation: Vec<u8>,
    #[serde(default)]
    pub diagnostics: Vec<String>,
}

impl MethodPatch {
    pub fn new(identity: MethodIdentity, new_implementation: Vec<u8>) -> Self {
        Self {
            identity,
            new_implementation,
            diagnostics: Vec::new(),
        }
    }
}
