//! Watch subscriptions over installed Magnet packages
//!
//! A [`PackageWatcher`] observes one install path in a background tokio task
//! and fans changes out to every registered [`PackageListener`]. Events are
//! either dispatched as they arrive or buffered and deduplicated per tick.

pub mod event;
pub mod listener;
pub mod watcher;

pub use event::{ChangeKind, FileChange};
pub use listener::{LoggingListener, PackageListener};
pub use watcher::{PackageWatcher, WatchMode, Watcher, WatcherFactory};
