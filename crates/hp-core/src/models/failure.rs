use crate::UnsupportedChange;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// Fatal compiler diagnostic; halts hot patching until a successful compile
    CompileError,
    /// Change that can only be picked up by a full recompile
    UnsupportedChange,
    /// A single patch failed to apply
    ApplyError,
}

/// A user-visible failure. Identity is the message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub message: String,
    pub category: FailureCategory,
}

impl Failure {
    pub fn new(message: impl Into<String>, category: FailureCategory) -> Self {
        Self {
            message: message.into(),
            category,
        }
    }

    pub fn compile_error(message: impl Into<String>) -> Self {
        Self::new(message, FailureCategory::CompileError)
    }

    pub fn apply_error(message: impl Into<String>) -> Self {
        Self::new(message, FailureCategory::ApplyError)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(message, FailureCategory::UnsupportedChange)
    }

    /// Failure for an edit the classifier flagged as requiring a full recompile.
    pub fn unsupported_edit(change: UnsupportedChange, path: &str) -> Self {
        Self::unsupported(format!(
            "errors: {}: {} in {}",
            change.as_str(),
            change.description(),
            path
        ))
    }

    pub fn is_compile_error(&self) -> bool {
        self.category == FailureCategory::CompileError
    }
}
