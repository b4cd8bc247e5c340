use crate::package::info::PackageInfo;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Installed-state record of a package
///
/// Equality ignores `pkg_path`: two records describe the same install when
/// name, version, install path and info text match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub name: String,
    pub version: i64,
    #[serde(default)]
    pub info: String,

    /// Archive the package was installed from
    #[serde(default)]
    pub pkg_path: PathBuf,
    pub install_path: PathBuf,
}

impl Package {
    /// Start a record from manifest info; paths are filled in by the installer
    pub fn from_info(info: &PackageInfo, pkg_path: &Path, install_path: &Path) -> Self {
        Self {
            name: info.name.clone(),
            version: info.version,
            info: info.info.clone(),
            pkg_path: pkg_path.to_path_buf(),
            install_path: install_path.to_path_buf(),
        }
    }
}

impl PartialEq for Package {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.version == other.version
            && self.install_path == other.install_path
            && self.info == other.info
    }
}

impl Eq for Package {}
