pub mod checksum;
pub mod installer;
pub mod recorder;
pub mod strategy;

pub use installer::{InstallFailure, ZipInstaller};
pub use recorder::{MultiVersionRecorder, RecordPolicy, SingleVersionRecorder};
pub use strategy::{NamedStrategy, PathStrategy, VersionedStrategy};
