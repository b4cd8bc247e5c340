//! Integration tests module
//!
//! This module contains all integration tests for Magnet CLI commands.

pub mod common;
pub mod info;
pub mod install;
pub mod list;
pub mod uninstall;
