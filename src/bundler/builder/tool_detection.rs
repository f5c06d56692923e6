//! External tool detection and availability checking.
//!
//! Resource Hacker is a Windows program. On other hosts it runs through
//! `wine` when one is installed.

use std::{path::PathBuf, sync::LazyLock};

/// Path of a working `wine`, if any.
///
/// Cached result to avoid repeated subprocess calls during a run.
pub static WINE: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    if cfg!(windows) {
        return None;
    }
    match which::which("wine") {
        Ok(path) => {
            log::debug!("Found wine at: {}", path.display());

            match std::process::Command::new(&path).arg("--version").output() {
                Ok(output) if output.status.success() => {
                    let version = String::from_utf8_lossy(&output.stdout);
                    log::info!("✓ wine available: {}", version.trim());
                    Some(path)
                }
                Ok(output) => {
                    log::warn!(
                        "wine found at {} but --version check failed (exit code: {:?}). \
                         Resource Hacker will be started directly. \
                         Stderr: {}",
                        path.display(),
                        output.status.code(),
                        String::from_utf8_lossy(&output.stderr)
                    );
                    None
                }
                Err(e) => {
                    log::warn!(
                        "wine found at {} but failed to execute: {}. \
                         Resource Hacker will be started directly.",
                        path.display(),
                        e
                    );
                    None
                }
            }
        }
        Err(e) => {
            log::debug!("wine not found in PATH: {}", e);
            None
        }
    }
});
