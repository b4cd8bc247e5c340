//! Magnet package lifecycle engine
//!
//! This crate provides the main Magnet library, re-exporting the shared model
//! from `magnet-core` and the watcher from `magnet-watch`, and organizing the
//! installer, recorders, task controller and orchestrator.

pub use magnet_core::{MagnetError, MagnetResult, Package, PackageInfo};

/// Core module re-exported from magnet-core.
pub mod core {
    pub use magnet_core::core::*;

    /// Path module re-exported from magnet-core.
    pub mod path {
        pub use magnet_core::core::path::*;
    }
}

/// Watcher module re-exported from magnet-watch.
pub mod watch {
    pub use magnet_watch::*;
}

/// Configuration management.
pub mod config;

/// Package extraction, install paths and records.
pub mod package;

/// Named task tracking.
pub mod task;

/// Install and uninstall orchestration.
pub mod manager;

/// Dependency injection infrastructure.
pub mod di;
