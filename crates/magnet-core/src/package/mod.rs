//! Package metadata and installed-package records

pub mod info;
pub mod record;

pub use info::{PackageInfo, MANIFEST_FILENAME};
pub use record::Package;
