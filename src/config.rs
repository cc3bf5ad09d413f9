use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReleaseError, Result};

/// Environment variable supplying the default protected branch
pub const PROTECTED_BRANCH_ENV: &str = "RELEASE_PROTECTED_BRANCH";

/// On-disk configuration for git-release.
///
/// Every field has a default, so a missing file is not an error.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Trunk branch minor/major releases originate from
    #[serde(default = "default_protected_branch")]
    pub protected_branch: String,

    /// Remote used for fetch and push
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Application name used in tag messages; empty means "derive from the
    /// repository directory name"
    #[serde(default)]
    pub app_name: String,
}

fn default_protected_branch() -> String {
    "master".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            protected_branch: default_protected_branch(),
            remote: default_remote(),
            app_name: String::new(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Lookup order:
/// 1. Custom path provided as parameter
/// 2. `gitrelease.toml` in the current directory
/// 3. `.gitrelease.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./gitrelease.toml").exists() {
        fs::read_to_string("./gitrelease.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".gitrelease.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str).map_err(|e| ReleaseError::config(e.to_string()))
}

/// Resolve the protected branch: CLI flag, then environment, then config
/// file.
pub fn resolve_protected_branch(flag: Option<&str>, config: &Config) -> String {
    if let Some(branch) = flag {
        return branch.to_string();
    }
    if let Ok(branch) = std::env::var(PROTECTED_BRANCH_ENV) {
        if !branch.is_empty() {
            return branch;
        }
    }
    config.protected_branch.clone()
}

/// Resolved per-run switches and settings, passed explicitly into every
/// layer instead of living in process-wide state.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Demote policy failures to warnings and skip confirmation prompts
    pub force: bool,
    /// Print the planned actions instead of mutating anything
    pub dry_run: bool,
    pub protected_branch: String,
    pub remote: String,
    /// Application name used in the tag message
    pub app_name: String,
}

impl RunConfig {
    pub fn new(
        force: bool,
        dry_run: bool,
        protected_branch: impl Into<String>,
        remote: impl Into<String>,
        app_name: impl Into<String>,
    ) -> Self {
        RunConfig {
            force,
            dry_run,
            protected_branch: protected_branch.into(),
            remote: remote.into(),
            app_name: app_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.protected_branch, "master");
        assert_eq!(config.remote, "origin");
        assert!(config.app_name.is_empty());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("protected_branch = \"main\"").unwrap();
        assert_eq!(config.protected_branch, "main");
        assert_eq!(config.remote, "origin");
    }

    #[test]
    #[serial]
    fn test_resolve_protected_branch_flag_wins() {
        std::env::set_var(PROTECTED_BRANCH_ENV, "env-branch");
        let config = Config::default();
        assert_eq!(
            resolve_protected_branch(Some("flag-branch"), &config),
            "flag-branch"
        );
        std::env::remove_var(PROTECTED_BRANCH_ENV);
    }

    #[test]
    #[serial]
    fn test_resolve_protected_branch_env_over_file() {
        std::env::set_var(PROTECTED_BRANCH_ENV, "env-branch");
        let config = Config::default();
        assert_eq!(resolve_protected_branch(None, &config), "env-branch");
        std::env::remove_var(PROTECTED_BRANCH_ENV);
    }

    #[test]
    #[serial]
    fn test_resolve_protected_branch_falls_back_to_file() {
        std::env::remove_var(PROTECTED_BRANCH_ENV);
        let config = Config {
            protected_branch: "trunk".to_string(),
            ..Config::default()
        };
        assert_eq!(resolve_protected_branch(None, &config), "trunk");
    }
}
