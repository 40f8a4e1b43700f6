use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_CACHE_DIR, DEFAULT_PROJECT_ROOT, DEFAULT_SOURCE_ROOTS,
};

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Layout of the host project being patched.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project root; relative values resolve against the working directory
    pub root: String,
    /// Tracked source roots, relative to `root`
    pub source_roots: Vec<String>,
    /// Cache directory for session and patch files, relative to `root`
    pub cache_dir: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: String::from(DEFAULT_PROJECT_ROOT),
            source_roots: DEFAULT_SOURCE_ROOTS.iter().map(|s| s.to_string()).collect(),
            cache_dir: String::from(DEFAULT_CACHE_DIR),
        }
    }
}

impl ProjectConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.source_roots.is_empty() {
            return Err(ConfigError::project("project.source_roots cannot be empty"));
        }

        if self.source_roots.iter().any(|r| r.trim().is_empty()) {
            return Err(ConfigError::project(
                "project.source_roots cannot contain empty entries",
            ));
        }

        let cache = Path::new(&self.cache_dir);
        if cache.is_absolute() || self.cache_dir.contains("..") {
            return Err(ConfigError::project(
                "project.cache_dir must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }

    /// Absolute project root.
    pub fn root_path(&self) -> ConfigErrorResult<PathBuf> {
        let root = PathBuf::from(&self.root);
        if root.is_absolute() {
            return Ok(root);
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::project("Cannot determine current working directory"))?;
        Ok(cwd.join(root))
    }

    /// Absolute source roots, in configured order.
    pub fn source_root_paths(&self) -> ConfigErrorResult<Vec<PathBuf>> {
        let root = self.root_path()?;
        Ok(self.source_roots.iter().map(|r| root.join(r)).collect())
    }

    /// Absolute cache directory.
    pub fn cache_path(&self) -> ConfigErrorResult<PathBuf> {
        Ok(self.root_path()?.join(&self.cache_dir))
    }
}
