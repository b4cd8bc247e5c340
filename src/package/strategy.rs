use crate::core::path::ensure_dir;
use crate::core::MagnetResult;
use crate::di::InstallStrategy;
use magnet_core::PackageInfo;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One install path per package name (`<base>/<name>`); reinstalls overwrite in place
#[derive(Debug, Default, Clone, Copy)]
pub struct NamedStrategy;

impl InstallStrategy for NamedStrategy {
    fn gen_install_path(&self, base_dir: &Path, info: &PackageInfo) -> MagnetResult<PathBuf> {
        let path = base_dir.join(&info.name);
        ensure_dir(&path)?;
        Ok(path)
    }
}

/// One install path per name and version (`<base>/<name>/<version>`)
#[derive(Debug, Default, Clone, Copy)]
pub struct VersionedStrategy;

impl InstallStrategy for VersionedStrategy {
    fn gen_install_path(&self, base_dir: &Path, info: &PackageInfo) -> MagnetResult<PathBuf> {
        let path = base_dir.join(&info.name).join(info.version.to_string());
        ensure_dir(&path)?;
        Ok(path)
    }
}

/// Configured choice of install-path strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStrategy {
    #[default]
    Name,
    Version,
}

impl PathStrategy {
    pub fn build(self) -> Arc<dyn InstallStrategy> {
        match self {
            PathStrategy::Name => Arc::new(NamedStrategy),
            PathStrategy::Version => Arc::new(VersionedStrategy),
        }
    }
}
