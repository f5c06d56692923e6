//! Node.js executable packager with Windows resource injection
//!
//! This library drives `pkg` to build executables whose Windows base
//! binaries carry custom version info and icons:
//! - target resolution (`node18-win-x64`, `host`, ...)
//! - pkg-fetch base binary cache and Resource Hacker acquisition
//! - VERSIONINFO script generation, compilation and injection
//! - multi-resolution icon preparation
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
