//! Packaging orchestration.
//!
//! This module provides the [`Packager`] that coordinates a run:
//!
//! 1. Resolve targets against the host
//! 2. Fetch the resource editor and base binaries (icon prepared alongside)
//! 3. Generate the resource script
//! 4. Copy base binaries into the workspace, then compile the script and
//!    inject it into each Windows working copy
//! 5. Run `pkg` against the workspace cache, or copy the working copies out
//! 6. Remove the scratch workspace
//!
//! # Module Organization
//!
//! - `orchestrator` - Main [`Packager`] struct and stage sequencing
//! - `workspace` - Per-run scratch directory layout
//! - `cleanup` - Working copies and workspace removal
//! - `tool_detection` - External tool availability checking

mod cleanup;
mod orchestrator;
pub(crate) mod tool_detection;
mod workspace;

pub use cleanup::{WorkingCopies, WorkingCopy};
pub use orchestrator::{PackageReport, PackagedArtifact, Packager};
pub use workspace::Workspace;
