use std::path::PathBuf;

/// Kind of edit that cannot be hot patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnsupportedChange {
    /// Assembly definition or compiler response file
    AssemblyFileEdit,
    /// Native or binary plugin
    NativePluginEdit,
}

impl UnsupportedChange {
    pub fn as_str(&self) -> &str {
        match self {
            Self::AssemblyFileEdit => "AssemblyFileEdit",
            Self::NativePluginEdit => "NativePluginEdit",
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::AssemblyFileEdit => "Editing assembly files requires a full recompile.",
            Self::NativePluginEdit => "Editing native plugins requires a full recompile.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    /// Forward to the asset refresher; `relative_path` is relative to the project root
    HotPatchable { relative_path: PathBuf },
    UnsupportedRequiresRecompile(UnsupportedChange),
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeClassification {
    pub kind: ChangeKind,
}

impl ChangeClassification {
    pub fn ignored() -> Self {
        Self {
            kind: ChangeKind::Ignored,
        }
    }

    pub fn unsupported(change: UnsupportedChange) -> Self {
        Self {
            kind: ChangeKind::UnsupportedRequiresRecompile(change),
        }
    }

    pub fn hot_patchable(relative_path: PathBuf) -> Self {
        Self {
            kind: ChangeKind::HotPatchable { relative_path },
        }
    }

    pub fn is_ignored(&self) -> bool {
        self.kind == ChangeKind::Ignored
    }

    pub fn unsupported_change(&self) -> Option<UnsupportedChange> {
        match self.kind {
            ChangeKind::UnsupportedRequiresRecompile(change) => Some(change),
            _ => None,
        }
    }
}
