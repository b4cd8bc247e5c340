//! Core types shared by the Magnet crates
//!
//! Holds the error type, platform paths, and the package data model so that
//! both the installer side and the watch side agree on what a package is.

pub mod core;
pub mod package;

pub use crate::core::{MagnetError, MagnetResult};
pub use package::{Package, PackageInfo};
