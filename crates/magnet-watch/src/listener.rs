use magnet_core::Package;
use std::path::Path;
use tracing::info;

/// Observer of file changes under a watched install path
///
/// Callbacks run on the watcher's background task and must not block
/// indefinitely.
pub trait PackageListener: Send + Sync {
    fn on_create(&self, _pkg: &Package, _path: &Path) {}

    fn on_update(&self, pkg: &Package, path: &Path);

    fn on_remove(&self, pkg: &Package, path: &Path);
}

/// Listener that logs every change
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingListener;

impl PackageListener for LoggingListener {
    fn on_create(&self, pkg: &Package, path: &Path) {
        info!(package = %pkg.name, version = pkg.version, file = %path.display(), "created");
    }

    fn on_update(&self, pkg: &Package, path: &Path) {
        info!(package = %pkg.name, version = pkg.version, file = %path.display(), "updated");
    }

    fn on_remove(&self, pkg: &Package, path: &Path) {
        info!(package = %pkg.name, version = pkg.version, file = %path.display(), "removed");
    }
}
