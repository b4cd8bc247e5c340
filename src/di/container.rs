//! Service container for dependency injection

use super::traits::{InstallStrategy, Installer, Recorder};
use crate::config::Config;
use crate::core::MagnetResult;
use crate::package::installer::ZipInstaller;
use magnet_watch::{LoggingListener, PackageListener, PackageWatcher, WatchMode, WatcherFactory};
use std::sync::Arc;

/// Service container for dependency injection
///
/// Holds the components a [`PackageManager`](crate::manager::PackageManager)
/// is built from, as `Arc<dyn Trait>` so each can be replaced independently.
#[derive(Clone)]
pub struct ServiceContainer {
    pub installer: Arc<dyn Installer>,
    pub recorder: Arc<dyn Recorder>,
    pub strategy: Arc<dyn InstallStrategy>,
    pub listener: Arc<dyn PackageListener>,
    pub watcher_factory: WatcherFactory,
}

impl ServiceContainer {
    /// Create a service container from the user's config file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Config file cannot be loaded or created
    /// - Install directory cannot be created
    /// - Record file exists but cannot be parsed
    pub fn new() -> MagnetResult<Self> {
        Self::from_config(&Config::load()?)
    }

    /// Create production components as described by `config`
    pub fn from_config(config: &Config) -> MagnetResult<Self> {
        let installer = ZipInstaller::new(config.install_dir()?)?;
        let recorder = config.record_policy.open(&config.record_file()?)?;

        Ok(Self {
            installer: Arc::new(installer),
            recorder,
            strategy: config.path_strategy.build(),
            listener: Arc::new(LoggingListener),
            watcher_factory: PackageWatcher::factory(config.watch_mode()),
        })
    }

    /// Create a service container with custom providers
    ///
    /// The listener defaults to [`LoggingListener`] and watchers to immediate
    /// [`PackageWatcher`]s.
    pub fn with_providers(
        installer: Arc<dyn Installer>,
        recorder: Arc<dyn Recorder>,
        strategy: Arc<dyn InstallStrategy>,
    ) -> Self {
        Self {
            installer,
            recorder,
            strategy,
            listener: Arc::new(LoggingListener),
            watcher_factory: PackageWatcher::factory(WatchMode::Immediate),
        }
    }

    pub fn with_listener(mut self, listener: Arc<dyn PackageListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn with_watcher_factory(mut self, factory: WatcherFactory) -> Self {
        self.watcher_factory = factory;
        self
    }
}
