//! Trait definitions for dependency injection

use crate::core::MagnetResult;
use crate::package::installer::InstallFailure;
use magnet_core::{Package, PackageInfo};
use std::path::{Path, PathBuf};

/// Trait for install-path generation
///
/// Implementations may create the returned directory. Whether two versions of
/// one package share a path decides if they can be installed side by side.
pub trait InstallStrategy: Send + Sync {
    fn gen_install_path(&self, base_dir: &Path, info: &PackageInfo) -> MagnetResult<PathBuf>;
}

/// Trait for package installation
pub trait Installer: Send + Sync {
    /// Read the manifest of a package archive without extracting it
    fn read_info(&self, source: &Path) -> MagnetResult<PackageInfo>;

    /// Extract a package into the path chosen by `strategy`.
    ///
    /// On failure the partially installed record (if the install path was
    /// already created) is returned alongside the error for rollback.
    fn install(
        &self,
        source: &Path,
        strategy: &dyn InstallStrategy,
    ) -> Result<Package, InstallFailure>;

    /// Remove the install path, and the source archive when asked.
    /// Paths that are already gone are not an error.
    fn uninstall(&self, pkg: &Package, delete_package_file: bool) -> MagnetResult<()>;
}

/// Trait for the durable record of installed packages
///
/// Implementations are internally synchronized.
pub trait Recorder: Send + Sync {
    fn save(&self, pkg: &Package) -> MagnetResult<()>;

    fn remove(&self, pkg: &Package) -> MagnetResult<()>;

    /// All tracked records across all names
    fn list_packages(&self) -> Vec<Package>;

    /// Every record for `name`; empty when none are tracked
    fn get_package(&self, name: &str) -> Vec<Package>;
}
