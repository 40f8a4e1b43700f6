use serde::{Deserialize, Serialize};

/// Stable identity of a patchable method: owning assembly, owning type, signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodIdentity {
    pub assembly: String,
    pub type_name: String,
    pub method: String,
}

impl MethodIdentity {
    pub fn new(
        assembly: impl Into<String>,
        type_name: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            assembly: assembly.into(),
            type_name: type_name.into(),
            method: method.into(),
        }
    }
}

impl std::fmt::Display for MethodIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}::{}", self.assembly, self.type_name, self.method)
    }
}

/// Opaque handle returned by an apply engine when it resolves a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodHandle(pub u64);
