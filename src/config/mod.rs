use crate::core::path::{config_file, default_install_dir, default_record_file, ensure_dir};
use crate::core::{MagnetError, MagnetResult};
use crate::package::recorder::RecordPolicy;
use crate::package::strategy::PathStrategy;
use magnet_watch::WatchMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How watch subscriptions deliver changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchModeSetting {
    /// Deliver each change as it arrives
    #[default]
    Immediate,
    /// Collect changes and deliver them once per `batch_interval_ms`
    Batched,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base directory install paths are generated under
    ///
    /// Default locations:
    /// - Windows: %APPDATA%\magnet\packages
    /// - Linux: ~/.local/share/magnet/packages
    /// - macOS: ~/Library/Application Support/magnet/packages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<PathBuf>,

    /// JSON file holding the installed-package records
    /// (defaults to `packages.json` beside the default install dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_file: Option<PathBuf>,

    /// How many records are kept per package name
    /// - "single": the latest install replaces the record (default)
    /// - "multi": every installed version is recorded
    #[serde(default)]
    pub record_policy: RecordPolicy,

    /// Install path layout
    /// - "name": `<install_dir>/<name>` (default)
    /// - "version": `<install_dir>/<name>/<version>`
    #[serde(default)]
    pub path_strategy: PathStrategy,

    #[serde(default)]
    pub watch_mode: WatchModeSetting,

    /// Flush interval for batched watching, in milliseconds
    #[serde(default = "default_batch_interval_ms")]
    pub batch_interval_ms: u64,

    /// Whether `uninstall` also deletes the package archive by default
    #[serde(default)]
    pub delete_archive_on_uninstall: bool,
}

fn default_batch_interval_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            install_dir: None,
            record_file: None,
            record_policy: RecordPolicy::default(),
            path_strategy: PathStrategy::default(),
            watch_mode: WatchModeSetting::default(),
            batch_interval_ms: default_batch_interval_ms(),
            delete_archive_on_uninstall: false,
        }
    }
}

impl Config {
    /// Load config from the platform-specific config directory, creating a
    /// default file if it doesn't exist
    ///
    /// Config locations:
    /// - Windows: %APPDATA%\magnet\config.yaml
    /// - Linux: ~/.config/magnet/config.yaml
    /// - macOS: ~/Library/Application Support/magnet/config.yaml
    pub fn load() -> MagnetResult<Self> {
        let config_path = config_file()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit path; a missing file yields the defaults
    /// and is not created
    pub fn load_from(path: &Path) -> MagnetResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content)
            .map_err(|e| MagnetError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save config to the platform-specific config directory
    pub fn save(&self) -> MagnetResult<()> {
        self.save_to(&config_file()?)
    }

    pub fn save_to(&self, path: &Path) -> MagnetResult<()> {
        let config_dir = path
            .parent()
            .ok_or_else(|| MagnetError::Path("Invalid config path".to_string()))?;
        ensure_dir(config_dir)?;

        let content = serde_yaml::to_string(self)
            .map_err(|e| MagnetError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)?;
        Ok(())
    }

    /// Get the install base directory
    pub fn install_dir(&self) -> MagnetResult<PathBuf> {
        match self.install_dir {
            Some(ref dir) => Ok(dir.clone()),
            None => default_install_dir(),
        }
    }

    /// Get the record file path
    pub fn record_file(&self) -> MagnetResult<PathBuf> {
        match self.record_file {
            Some(ref file) => Ok(file.clone()),
            None => default_record_file(),
        }
    }

    pub fn watch_mode(&self) -> WatchMode {
        match self.watch_mode {
            WatchModeSetting::Immediate => WatchMode::Immediate,
            WatchModeSetting::Batched => {
                WatchMode::Batched(Duration::from_millis(self.batch_interval_ms))
            }
        }
    }
}
