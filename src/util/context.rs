//! Global context for demokit operations.
//!
//! Provides centralized access to the working directory, configuration
//! paths and manifest discovery.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::{find_manifest, ManifestError};
use crate::util::config::{self, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Global config file (~/.demokit/config.toml), if a home directory exists
    global_config: Option<PathBuf>,

    /// Directory above which the manifest is not searched for
    ceiling: Option<PathBuf>,
}

/// Variable naming the directory the upward manifest search stops at.
pub const CEILING_ENV: &str = "DEMOKIT_MANIFEST_CEILING";

impl GlobalContext {
    /// Create a new GlobalContext for the process working directory, with
    /// the search ceiling taken from `DEMOKIT_MANIFEST_CEILING`.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let ceiling = std::env::var_os(CEILING_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Ok(Self::with_cwd(cwd).with_ceiling(ceiling))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            global_config: config::global_config_path(),
            ceiling: None,
        }
    }

    /// Stop the upward manifest search at `dir`.
    pub fn with_ceiling(mut self, dir: Option<PathBuf>) -> Self {
        self.ceiling = dir;
        self
    }

    /// Override the global config location.
    pub fn with_global_config(mut self, path: Option<PathBuf>) -> Self {
        self.global_config = path;
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the global configuration file path.
    pub fn global_config_path(&self) -> Option<&Path> {
        self.global_config.as_deref()
    }

    /// Find the manifest starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Result<PathBuf, ManifestError> {
        find_manifest(&self.cwd, self.ceiling.as_deref())
    }

    /// The project root: the manifest's directory, or cwd without one.
    pub fn project_root(&self) -> PathBuf {
        self.find_manifest()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| self.cwd.clone())
    }

    /// Load the merged global and project configuration.
    pub fn load_config(&self) -> Config {
        let project = config::project_config_path(&self.project_root());
        tracing::debug!("loading project config from {}", project.display());
        config::load_config(self.global_config_path(), &project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::MANIFEST_NAME;
    use tempfile::TempDir;

    #[test]
    fn test_project_root_from_manifest() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(MANIFEST_NAME), "").unwrap();
        let nested = tmp.path().join("src");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = GlobalContext::with_cwd(nested).with_ceiling(Some(tmp.path().to_path_buf()));
        assert_eq!(ctx.project_root(), tmp.path());
    }

    #[test]
    fn test_project_config_is_loaded() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(MANIFEST_NAME), "").unwrap();
        let config_path = config::project_config_path(tmp.path());
        std::fs::create_dir_all(config_path.parent().unwrap()).unwrap();
        std::fs::write(&config_path, "[run]\njobs = 3\n").unwrap();

        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).with_global_config(None);
        assert_eq!(ctx.load_config().run.jobs, Some(3));
    }

    #[test]
    fn test_global_config_is_overridden_by_project() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        std::fs::write(&global, "[run]\njobs = 1\nfail_fast = true\n").unwrap();

        let project = tmp.path().join("project");
        let config_path = config::project_config_path(&project);
        std::fs::create_dir_all(config_path.parent().unwrap()).unwrap();
        std::fs::write(&config_path, "[run]\njobs = 6\n").unwrap();

        let ctx = GlobalContext::with_cwd(project.clone())
            .with_global_config(Some(global))
            .with_ceiling(Some(project));
        let config = ctx.load_config();
        assert_eq!(config.run.jobs, Some(6));
        assert_eq!(config.run.fail_fast, Some(true));
    }

    #[test]
    fn test_project_root_without_manifest_is_cwd() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf())
            .with_ceiling(Some(tmp.path().to_path_buf()));
        assert_eq!(ctx.project_root(), tmp.path());
        assert!(ctx.find_manifest().is_err());
    }
}
