//! Package lifecycle orchestration
//!
//! [`PackageManager`] sequences an install or uninstall across the installer,
//! the recorder, the task controller and per-path watchers. Each operation
//! holds the task for its package name, so a second concurrent request for the
//! same name fails with `TaskAlreadyRunning` instead of queuing.

pub mod policy;

pub use policy::{plan_removals, InstallPolicy};

use crate::core::{MagnetError, MagnetResult};
use crate::di::{InstallStrategy, Installer, Recorder, ServiceContainer};
use crate::package::installer::InstallFailure;
use crate::task::{TaskController, TaskHandle};
use magnet_core::{Package, PackageInfo};
use magnet_watch::{PackageListener, Watcher, WatcherFactory};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct PackageManager {
    installer: Arc<dyn Installer>,
    recorder: Arc<dyn Recorder>,
    strategy: Arc<dyn InstallStrategy>,
    listener: Arc<dyn PackageListener>,
    watcher_factory: WatcherFactory,
    tasks: TaskController,
    watchers: Mutex<HashMap<PathBuf, Box<dyn Watcher>>>,
}

/// Completes one task step when dropped
struct StepGuard(TaskHandle);

impl Drop for StepGuard {
    fn drop(&mut self) {
        if let Err(err) = self.0.try_done() {
            error!(task = %self.0.name(), error = %err, "failed to complete task step");
        }
    }
}

impl PackageManager {
    pub fn new(container: ServiceContainer) -> Self {
        Self {
            installer: container.installer,
            recorder: container.recorder,
            strategy: container.strategy,
            listener: container.listener,
            watcher_factory: container.watcher_factory,
            tasks: TaskController::new(),
            watchers: Mutex::new(HashMap::new()),
        }
    }

    pub fn tasks(&self) -> &TaskController {
        &self.tasks
    }

    /// Read a package's manifest without installing it
    pub fn read_info(&self, source: &Path) -> MagnetResult<PackageInfo> {
        self.installer.read_info(source)
    }

    pub fn get_package(&self, name: &str) -> Vec<Package> {
        self.recorder.get_package(name)
    }

    pub fn list_packages(&self) -> Vec<Package> {
        self.recorder.list_packages()
    }

    /// Install paths with an active watch subscription
    pub fn watched_paths(&self) -> Vec<PathBuf> {
        self.watchers.lock().keys().cloned().collect()
    }

    /// Install a package archive according to `policy`.
    ///
    /// Must be called from within a tokio runtime; extraction runs on the
    /// blocking pool and the new watch subscription on a background task.
    pub async fn install(&self, source: &Path, policy: InstallPolicy) -> MagnetResult<Package> {
        let info = self.installer.read_info(source)?;

        let task = self.tasks.add_task(&info.name)?;
        task.add(1);
        let _step = StepGuard(task);

        let stale = plan_removals(self.recorder.get_package(&info.name), &info, policy)?;
        if !stale.is_empty() {
            info!(
                package = %info.name,
                version = info.version,
                stale = stale.len(),
                "removing existing versions before install"
            );
            self.remove_records(&stale, false);
        }

        let pkg = self.extract(source).await?;
        self.recorder.save(&pkg)?;

        if let Err(err) = self.start_watch(&pkg) {
            warn!(package = %pkg.name, error = %err, "installed without a watch subscription");
        }
        Ok(pkg)
    }

    /// Uninstall every recorded version of `name`.
    ///
    /// Per-record failures are logged and skipped; the call fails only when
    /// nothing could be removed. Returns the records that were removed.
    pub fn uninstall(&self, name: &str, delete_package_file: bool) -> MagnetResult<Vec<Package>> {
        let records = self.recorder.get_package(name);
        if records.is_empty() {
            return Err(MagnetError::PackageNotFound(name.to_string()));
        }

        let task = self.tasks.add_task(name)?;
        task.add(records.len());

        let mut removed = Vec::with_capacity(records.len());
        let mut first_error = None;
        for pkg in records {
            let _step = StepGuard(task.clone());
            match self.remove_record(&pkg, delete_package_file) {
                Ok(()) => removed.push(pkg),
                Err(err) => {
                    warn!(package = %pkg.name, version = pkg.version, error = %err, "failed to uninstall");
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) if removed.is_empty() => Err(err),
            _ => Ok(removed),
        }
    }

    /// Attach watch subscriptions to recorded packages that have none.
    ///
    /// Returns the number of subscriptions started.
    pub fn watch_installed(&self) -> usize {
        let mut started = 0;
        for pkg in self.recorder.list_packages() {
            if self.watchers.lock().contains_key(&pkg.install_path) {
                continue;
            }
            match self.start_watch(&pkg) {
                Ok(()) => started += 1,
                Err(err) => warn!(package = %pkg.name, error = %err, "failed to watch package"),
            }
        }
        started
    }

    /// Stop every watch subscription
    pub fn close(&self) {
        let watchers: Vec<_> = self.watchers.lock().drain().collect();
        for (_, watcher) in watchers {
            watcher.stop();
        }
    }

    async fn extract(&self, source: &Path) -> MagnetResult<Package> {
        let installer = Arc::clone(&self.installer);
        let strategy = Arc::clone(&self.strategy);
        let archive = source.to_path_buf();
        let result =
            tokio::task::spawn_blocking(move || installer.install(&archive, strategy.as_ref()))
                .await
                .map_err(|e| MagnetError::Join(e.to_string()))?;

        match result {
            Ok(pkg) => Ok(pkg),
            Err(InstallFailure { package, error }) => {
                if let Some(partial) = package {
                    warn!(package = %partial.name, error = %error, "install failed, rolling back");
                    if let Err(err) = self.installer.uninstall(&partial, true) {
                        error!(package = %partial.name, error = %err, "rollback failed");
                    }
                }
                Err(error)
            }
        }
    }

    fn remove_records(&self, pkgs: &[Package], delete_package_file: bool) {
        for pkg in pkgs {
            if let Err(err) = self.remove_record(pkg, delete_package_file) {
                warn!(package = %pkg.name, version = pkg.version, error = %err, "failed to remove old version");
            }
        }
    }

    fn remove_record(&self, pkg: &Package, delete_package_file: bool) -> MagnetResult<()> {
        self.installer.uninstall(pkg, delete_package_file)?;
        self.stop_watch(&pkg.install_path);
        self.recorder.remove(pkg)
    }

    fn start_watch(&self, pkg: &Package) -> MagnetResult<()> {
        let watcher = (self.watcher_factory)();
        watcher.add_listener(Arc::clone(&self.listener));
        watcher.watch(pkg)?;

        let previous = self.watchers.lock().insert(pkg.install_path.clone(), watcher);
        if let Some(previous) = previous {
            previous.stop();
        }
        Ok(())
    }

    fn stop_watch(&self, install_path: &Path) {
        let watcher = self.watchers.lock().remove(install_path);
        if let Some(watcher) = watcher {
            watcher.stop();
        }
    }
}
