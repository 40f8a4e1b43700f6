//! Maps file-system change events onto hot-patch, recompile or ignore.
//!
//! Classification is pure: it only looks at the event's path, its
//! directory flag and the configured source roots.

use crate::{ChangeClassification, ChangeEvent, UnsupportedChange};

use std::path::{Component, Path, PathBuf};

/// Assembly definitions and compiler response files.
pub const COMPILE_FILE_EXTENSIONS: [&str; 3] = ["asmdef", "asmref", "rsp"];

/// Native and binary plugins.
pub const PLUGIN_EXTENSIONS: [&str; 10] = [
    "dll", "bundle", "dylib", "so", "cpp", "h", "aar", "jar", "a", "java",
];

/// Handled by the regular compile pipeline, never refreshed as assets.
pub const BLACKLISTED_EXTENSIONS: [&str; 5] = ["cs", "unity", "meta", "mdb", "pdb"];

#[derive(Debug, Clone)]
pub struct ChangeClassifier {
    project_root: PathBuf,
    source_roots: Vec<PathBuf>,
}

impl ChangeClassifier {
    /// `source_roots` may be absolute or relative to `project_root`.
    pub fn new(project_root: impl Into<PathBuf>, source_roots: &[PathBuf]) -> Self {
        let project_root = normalize(&project_root.into());
        let source_roots = source_roots
            .iter()
            .map(|root| normalize(&project_root.join(root)))
            .collect();
        Self {
            project_root,
            source_roots,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn classify(&self, event: &ChangeEvent) -> ChangeClassification {
        if event.is_dir {
            return ChangeClassification::ignored();
        }

        let extension = event
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if COMPILE_FILE_EXTENSIONS.contains(&extension.as_str()) {
            return ChangeClassification::unsupported(UnsupportedChange::AssemblyFileEdit);
        }

        if PLUGIN_EXTENSIONS.contains(&extension.as_str()) {
            return ChangeClassification::unsupported(UnsupportedChange::NativePluginEdit);
        }

        if BLACKLISTED_EXTENSIONS.contains(&extension.as_str()) {
            return ChangeClassification::ignored();
        }

        let absolute = normalize(&if event.path.is_absolute() {
            event.path.clone()
        } else {
            self.project_root.join(&event.path)
        });

        if !self.source_roots.iter().any(|root| absolute.starts_with(root)) {
            return ChangeClassification::ignored();
        }

        match absolute.strip_prefix(&self.project_root) {
            Ok(relative) => ChangeClassification::hot_patchable(relative.to_path_buf()),
            Err(_) => ChangeClassification::hot_patchable(absolute),
        }
    }
}

/// Resolve `.` and `..` lexically so `Assets/../Library` cannot pass a
/// component-wise `starts_with` check against `Assets`. `..` never climbs
/// above the root of an absolute path.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(Component::ParentDir),
            },
            other => normalized.push(other),
        }
    }
    normalized
}
