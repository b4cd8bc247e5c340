//! Mock implementations of service traits for testing

use super::traits::{InstallStrategy, Installer, Recorder};
use crate::core::{MagnetError, MagnetResult};
use crate::package::installer::InstallFailure;
use magnet_core::package::MANIFEST_FILENAME;
use magnet_core::{Package, PackageInfo};
use magnet_watch::{PackageListener, Watcher, WatcherFactory};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Mock installer for testing
///
/// Serves manifests registered with [`MockInstaller::add_package`] and
/// generates install paths through the given strategy without touching any
/// archive.
///
/// # Example
///
/// ```
/// use magnet::di::mocks::MockInstaller;
/// use magnet::di::Installer;
/// use magnet_core::PackageInfo;
/// use std::path::Path;
///
/// let installer = MockInstaller::new("/tmp/magnet-test");
/// installer.add_package(
///     "hello.pkg",
///     PackageInfo {
///         name: "hello".to_string(),
///         version: 1,
///         ..Default::default()
///     },
/// );
///
/// assert_eq!(installer.read_info(Path::new("hello.pkg")).unwrap().name, "hello");
/// ```
pub struct MockInstaller {
    base_dir: PathBuf,
    packages: Mutex<HashMap<PathBuf, PackageInfo>>,
    failing_installs: Mutex<HashSet<PathBuf>>,
    failing_uninstalls: Mutex<HashSet<PathBuf>>,
    uninstalled: Mutex<Vec<(Package, bool)>>,
}

impl MockInstaller {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            packages: Mutex::new(HashMap::new()),
            failing_installs: Mutex::new(HashSet::new()),
            failing_uninstalls: Mutex::new(HashSet::new()),
            uninstalled: Mutex::new(Vec::new()),
        }
    }

    /// Register the manifest served for `source`
    pub fn add_package(&self, source: impl Into<PathBuf>, info: PackageInfo) {
        self.packages.lock().insert(source.into(), info);
    }

    /// Make installs of `source` fail after the install path is chosen
    pub fn fail_install(&self, source: impl Into<PathBuf>) {
        self.failing_installs.lock().insert(source.into());
    }

    /// Make uninstalls of `install_path` fail
    pub fn fail_uninstall(&self, install_path: impl Into<PathBuf>) {
        self.failing_uninstalls.lock().insert(install_path.into());
    }

    /// Every uninstall call so far, with its `delete_package_file` flag
    pub fn uninstalled(&self) -> Vec<(Package, bool)> {
        self.uninstalled.lock().clone()
    }
}

impl Installer for MockInstaller {
    fn read_info(&self, source: &Path) -> MagnetResult<PackageInfo> {
        self.packages
            .lock()
            .get(source)
            .cloned()
            .ok_or_else(|| MagnetError::ManifestMissing(MANIFEST_FILENAME.to_string()))
    }

    fn install(
        &self,
        source: &Path,
        strategy: &dyn InstallStrategy,
    ) -> Result<Package, InstallFailure> {
        let info = self.read_info(source)?;
        let install_path = strategy.gen_install_path(&self.base_dir, &info)?;
        let pkg = Package::from_info(&info, source, &install_path);

        if self.failing_installs.lock().contains(source) {
            return Err(InstallFailure {
                package: Some(pkg),
                error: MagnetError::ChecksumMismatch {
                    file: info.exec_name.unwrap_or_default(),
                    expected: "0".repeat(32),
                    actual: "f".repeat(32),
                },
            });
        }
        Ok(pkg)
    }

    fn uninstall(&self, pkg: &Package, delete_package_file: bool) -> MagnetResult<()> {
        if self.failing_uninstalls.lock().contains(&pkg.install_path) {
            return Err(MagnetError::Path(format!(
                "Cannot remove {}",
                pkg.install_path.display()
            )));
        }
        self.uninstalled
            .lock()
            .push((pkg.clone(), delete_package_file));
        Ok(())
    }
}

/// Mock recorder for testing
///
/// Keeps every distinct record per name in memory, like the multi-version
/// recorder, without writing a file.
#[derive(Default)]
pub struct MockRecorder {
    packages: Mutex<Vec<Package>>,
}

impl MockRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record without going through `save`
    pub fn insert(&self, pkg: Package) {
        self.packages.lock().push(pkg);
    }
}

impl Recorder for MockRecorder {
    fn save(&self, pkg: &Package) -> MagnetResult<()> {
        let mut packages = self.packages.lock();
        if !packages.contains(pkg) {
            packages.push(pkg.clone());
        }
        Ok(())
    }

    fn remove(&self, pkg: &Package) -> MagnetResult<()> {
        self.packages.lock().retain(|p| p != pkg);
        Ok(())
    }

    fn list_packages(&self) -> Vec<Package> {
        self.packages.lock().clone()
    }

    fn get_package(&self, name: &str) -> Vec<Package> {
        self.packages
            .lock()
            .iter()
            .filter(|p| p.name == name)
            .cloned()
            .collect()
    }
}

#[derive(Default)]
struct WatchLog {
    watched: Vec<PathBuf>,
    stopped: Vec<PathBuf>,
}

/// Factory of watchers that only log which paths were watched and stopped
#[derive(Clone, Default)]
pub struct MockWatcherFactory {
    log: Arc<Mutex<WatchLog>>,
}

impl MockWatcherFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn factory(&self) -> WatcherFactory {
        let log = Arc::clone(&self.log);
        Arc::new(move || {
            Box::new(MockWatcher {
                log: Arc::clone(&log),
                path: Mutex::new(None),
            }) as Box<dyn Watcher>
        })
    }

    pub fn watched(&self) -> Vec<PathBuf> {
        self.log.lock().watched.clone()
    }

    pub fn stopped(&self) -> Vec<PathBuf> {
        self.log.lock().stopped.clone()
    }
}

struct MockWatcher {
    log: Arc<Mutex<WatchLog>>,
    path: Mutex<Option<PathBuf>>,
}

impl Watcher for MockWatcher {
    fn add_listener(&self, _listener: Arc<dyn PackageListener>) {}

    fn watch(&self, pkg: &Package) -> MagnetResult<()> {
        let mut path = self.path.lock();
        if path.is_some() {
            return Err(MagnetError::Watch("Watcher already started".to_string()));
        }
        *path = Some(pkg.install_path.clone());
        self.log.lock().watched.push(pkg.install_path.clone());
        Ok(())
    }

    fn stop(&self) {
        if let Some(path) = self.path.lock().take() {
            self.log.lock().stopped.push(path);
        }
    }
}
