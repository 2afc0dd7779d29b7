//! Configuration file support.
//!
//! Two locations are read:
//! - Global: `~/.demokit/config.toml` - user-wide defaults
//! - Project: `.demokit/config.toml` - project-specific overrides
//!
//! Project config takes precedence over global config.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::ops::format::MessageFormat;
use crate::util::shell::ColorChoice;

/// demokit configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Run settings
    pub run: RunConfig,

    /// Environment injected into every run
    pub env: EnvConfig,

    /// Terminal settings
    pub term: TermConfig,
}

/// Run-related configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Suites run in parallel (None = one at a time)
    pub jobs: Option<usize>,

    /// Stop after the first failing suite
    pub fail_fast: Option<bool>,

    /// Default output format (human, json)
    pub message_format: Option<String>,
}

/// Environment variables applied to every run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    pub vars: BTreeMap<String, String>,
}

/// Terminal configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TermConfig {
    /// Color output (auto, always, never)
    pub color: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't exist
    /// or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.run.jobs.is_some() {
            self.run.jobs = other.run.jobs;
        }
        if other.run.fail_fast.is_some() {
            self.run.fail_fast = other.run.fail_fast;
        }
        if other.run.message_format.is_some() {
            self.run.message_format = other.run.message_format;
        }

        // Variables merge key by key
        self.env.vars.extend(other.env.vars);

        if other.term.color.is_some() {
            self.term.color = other.term.color;
        }
    }

    /// Parse the configured color choice.
    pub fn color(&self) -> Option<ColorChoice> {
        self.term.color.as_ref().and_then(|s| match s.parse() {
            Ok(c) => Some(c),
            Err(e) => {
                tracing::warn!("ignoring [term] color: {}", e);
                None
            }
        })
    }

    /// Parse the configured message format.
    pub fn message_format(&self) -> Option<MessageFormat> {
        self.run
            .message_format
            .as_ref()
            .and_then(|s| match s.parse() {
                Ok(f) => Some(f),
                Err(e) => {
                    tracing::warn!("ignoring [run] message_format: {}", e);
                    None
                }
            })
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.demokit/config.toml)
/// 2. Global config (~/.demokit/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global config directory (~/.demokit).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".demokit"))
}

/// Get the global config path (~/.demokit/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.demokit/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".demokit").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.run.jobs.is_none());
        assert!(config.run.fail_fast.is_none());
        assert!(config.env.vars.is_empty());
        assert!(config.color().is_none());
        assert!(config.message_format().is_none());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[run]
jobs = 4
fail_fast = true
message_format = "json"

[env.vars]
AZ = "111"

[term]
color = "never"
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.run.jobs, Some(4));
        assert_eq!(config.run.fail_fast, Some(true));
        assert_eq!(config.message_format(), Some(MessageFormat::Json));
        assert_eq!(config.env.vars.get("AZ").map(String::as_str), Some("111"));
        assert_eq!(config.color(), Some(ColorChoice::Never));
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.run.jobs = Some(4);
        base.env.vars.insert("AZ".to_string(), "1".to_string());
        base.env.vars.insert("KEEP".to_string(), "yes".to_string());

        let mut override_cfg = Config::default();
        override_cfg.env.vars.insert("AZ".to_string(), "2".to_string());
        override_cfg.term.color = Some("always".to_string());

        base.merge(override_cfg);

        assert_eq!(base.run.jobs, Some(4)); // Not overridden
        assert_eq!(base.env.vars["AZ"], "2");
        assert_eq!(base.env.vars["KEEP"], "yes");
        assert_eq!(base.color(), Some(ColorChoice::Always));
    }

    #[test]
    fn test_project_can_turn_off_fail_fast() {
        let mut global = Config::default();
        global.run.fail_fast = Some(true);

        let mut project = Config::default();
        project.run.fail_fast = Some(false);
        global.merge(project);
        assert_eq!(global.run.fail_fast, Some(false));

        // Unset keys leave the earlier value alone
        global.merge(Config::default());
        assert_eq!(global.run.fail_fast, Some(false));
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let mut config = Config::default();
        config.term.color = Some("purple".to_string());
        config.run.message_format = Some("xml".to_string());
        assert!(config.color().is_none());
        assert!(config.message_format().is_none());
    }

    #[test]
    fn test_broken_file_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[run\njobs = ").unwrap();

        assert!(Config::load(&config_path).is_err());
        let config = Config::load_or_default(&config_path);
        assert!(config.run.jobs.is_none());
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
[run]
jobs = 2
message_format = "json"
"#,
        )
        .unwrap();

        std::fs::write(
            &project_path,
            r#"
[run]
jobs = 8
"#,
        )
        .unwrap();

        let config = load_config(Some(&global_path), &project_path);
        assert_eq!(config.run.jobs, Some(8));
        assert_eq!(config.message_format(), Some(MessageFormat::Json));
    }

    #[test]
    fn test_load_config_missing_files() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(None, &tmp.path().join("missing.toml"));
        assert!(config.run.jobs.is_none());
    }
}
