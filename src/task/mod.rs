//! Per-name mutual exclusion and completion tracking for lifecycle operations

pub mod controller;

pub use controller::{TaskController, TaskHandle};
