use std::path::{Path, PathBuf};

/// A single file-system change. Consumed once by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    /// File still exists (false means it was deleted)
    pub exists: bool,
    pub is_dir: bool,
}

impl ChangeEvent {
    pub fn file(path: impl Into<PathBuf>, exists: bool) -> Self {
        Self {
            path: path.into(),
            exists,
            is_dir: false,
        }
    }

    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            exists: true,
            is_dir: true,
        }
    }

    /// Build an event by inspecting the file system at `path`.
    pub fn observe(path: &Path) -> Self {
        match std::fs::metadata(path) {
            Ok(meta) => Self {
                path: path.to_path_buf(),
                exists: true,
                is_dir: meta.is_dir(),
            },
            Err(_) => Self::file(path, false),
        }
    }
}
