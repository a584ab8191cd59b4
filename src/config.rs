//! Global configuration management
//!
//! Persistent defaults for reviews, stored at `~/.pkgreview/config.toml`.
//! Command-line options override these values when a review is set up.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::paths;

/// Global pkgreview configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Mock chroot configuration (`mock -r`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_config: Option<String>,
    /// Extra options passed to every mock invocation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_options: Option<String>,
    /// Directories searched for shell-script checks
    #[serde(default)]
    pub plugin_dirs: Vec<PathBuf>,
    /// Flag values applied before command-line `-D` options
    #[serde(default)]
    pub flags: BTreeMap<String, String>,
    /// Checks excluded from every review
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Parent directory for review work directories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workdir: Option<PathBuf>,
}

impl GlobalConfig {
    /// Get the config file path
    #[must_use]
    pub fn config_path() -> PathBuf {
        paths::global_config()
    }

    /// Load config from disk, or the defaults if it is missing or unreadable
    #[must_use]
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(&path).map(|content| toml::from_str(&content)) {
            Ok(Ok(config)) => config,
            Ok(Err(e)) => {
                warn!("Ignoring invalid config {}: {e}", path.display());
                Self::default()
            },
            Err(e) => {
                warn!("Cannot read config {}: {e}", path.display());
                Self::default()
            },
        }
    }

    /// Save config to disk
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(paths::global_config_dir())?;
        let path = Self::config_path();
        fs::write(&path, self.to_toml()?)?;
        Ok(path)
    }

    /// Serialize as TOML
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Mock options split into arguments
    #[must_use]
    pub fn mock_args(&self) -> Vec<String> {
        split_options(self.mock_options.as_deref())
    }

    /// The config written by `--init-config`
    #[must_use]
    pub fn starter() -> Self {
        Self {
            mock_config: Some("fedora-rawhide-x86_64".to_string()),
            mock_options: Some("--no-cleanup-after --no-clean".to_string()),
            plugin_dirs: vec![paths::global_config_dir().join("plugins")],
            flags: BTreeMap::new(),
            exclude: Vec::new(),
            workdir: None,
        }
    }
}

/// Split a mock options string on whitespace
#[must_use]
pub fn split_options(options: Option<&str>) -> Vec<String> {
    options
        .map(|o| o.split_whitespace().map(String::from).collect())
        .unwrap_or_default()
}
