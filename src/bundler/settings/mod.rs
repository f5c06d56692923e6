//! Configuration structures for packaging runs.
//!
//! This module provides the [`Settings`] consumed by the packager, the
//! [`SettingsBuilder`] that fills in defaults, and the metadata and `pkg`
//! invocation types they carry.

mod builder;
mod core;
mod package;
mod pkg;

// Re-export all public types
pub use builder::{APP_DIR_NAME, DEFAULT_OUT_DIR, SettingsBuilder};
pub use core::Settings;
pub use package::MetaData;
pub use pkg::PkgSettings;
