use crate::core::error::{MagnetError, MagnetResult};
use std::path::{Component, Path, PathBuf};

/// Get the Magnet config directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\magnet
/// - Linux: ~/.config/magnet
/// - macOS: ~/Library/Application Support/magnet
pub fn magnet_home() -> MagnetResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| MagnetError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("magnet"))
}

/// Get the Magnet data directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\magnet
/// - Linux: ~/.local/share/magnet
/// - macOS: ~/Library/Application Support/magnet
pub fn data_dir() -> MagnetResult<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| MagnetError::Path("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("magnet"))
}

/// Get the config file path (<magnet_home>/config.yaml)
pub fn config_file() -> MagnetResult<PathBuf> {
    Ok(magnet_home()?.join("config.yaml"))
}

/// Directory that install paths are generated under by default
pub fn default_install_dir() -> MagnetResult<PathBuf> {
    Ok(data_dir()?.join("packages"))
}

/// Record store written by the recorders by default
pub fn default_record_file() -> MagnetResult<PathBuf> {
    Ok(data_dir()?.join("packages.json"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> MagnetResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Check that `name` can be used as a single path component.
///
/// Rejects empty names, separators, and `.`/`..`.
pub fn is_plain_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(c)), None) if c == name
    )
}
