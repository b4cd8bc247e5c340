//! Dependency injection infrastructure for Magnet
//!
//! The orchestrator talks to its installer, recorder and path strategy through
//! trait objects so tests can swap in the in-memory doubles from [`mocks`].
//!
//! # Example (Production)
//! ```no_run
//! use magnet::di::ServiceContainer;
//! use magnet::manager::PackageManager;
//!
//! # fn example() -> magnet::core::MagnetResult<()> {
//! let container = ServiceContainer::new()?;
//! let manager = PackageManager::new(container);
//! println!("{} packages installed", manager.list_packages().len());
//! # Ok(())
//! # }
//! ```
//!
//! # Example (Testing)
//! ```
//! use magnet::di::{mocks::*, ServiceContainer};
//! use magnet::package::strategy::NamedStrategy;
//! use std::sync::Arc;
//!
//! let installer = Arc::new(MockInstaller::new("/tmp/magnet-test"));
//! let recorder = Arc::new(MockRecorder::new());
//! let watchers = MockWatcherFactory::new();
//!
//! let container =
//!     ServiceContainer::with_providers(installer, recorder, Arc::new(NamedStrategy))
//!         .with_watcher_factory(watchers.factory());
//! ```

pub mod container;
pub mod mocks;
pub mod traits;

pub use container::ServiceContainer;
pub use traits::{InstallStrategy, Installer, Recorder};
