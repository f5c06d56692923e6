//! Working copies and end-of-run cleanup.
//!
//! Shared cache binaries are only ever read: each one is copied into the
//! workspace's private pkg cache and the copy is what gets patched and
//! packaged. Cleanup therefore only has to remove the workspace.

use super::workspace::Workspace;
use crate::bundler::{CleanupError, Result, utils::fs};
use std::path::{Path, PathBuf};

/// A base binary copied into the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingCopy {
    /// Shared cache path it was copied from
    pub shared: PathBuf,
    /// Copy inside the workspace
    pub copy: PathBuf,
}

/// Working copies taken during a run, one per distinct destination.
#[derive(Debug, Default)]
pub struct WorkingCopies {
    entries: Vec<WorkingCopy>,
}

impl WorkingCopies {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies in the order they were taken.
    pub fn entries(&self) -> &[WorkingCopy] {
        &self.entries
    }

    /// Copy `shared` to `copy` unless that destination was already taken.
    ///
    /// Returns whether the copy was newly made. The copy is registered only
    /// once it exists.
    pub async fn take(&mut self, shared: &Path, copy: &Path) -> Result<bool> {
        if self.entries.iter().any(|e| e.copy == copy) {
            return Ok(false);
        }

        fs::copy_file(shared, copy).await?;
        log::debug!("Copied {} to {}", shared.display(), copy.display());

        self.entries.push(WorkingCopy {
            shared: shared.to_path_buf(),
            copy: copy.to_path_buf(),
        });
        Ok(true)
    }
}

/// Remove the workspace unless `keep_tmp`.
///
/// Failures are logged and returned, never raised.
pub async fn finish(workspace: &Workspace, keep_tmp: bool) -> Vec<CleanupError> {
    log::info!("Cleaning up...");
    let mut errors = Vec::new();

    if keep_tmp {
        log::info!("Keeping scratch workspace {}", workspace.root().display());
    } else if let Err(e) = tokio::fs::remove_dir_all(workspace.root()).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            errors.push(CleanupError {
                path: workspace.root().to_path_buf(),
                source: e,
            });
        }
    }

    for error in &errors {
        log::warn!("{}", error);
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> (tempfile::TempDir, Workspace, PathBuf) {
        let temp = tempfile::tempdir().unwrap();
        let ws = Workspace::create(&temp.path().join("tmp")).await.unwrap();
        let shared = temp.path().join("fetched-v18.5.0-win-x64");
        std::fs::write(&shared, b"pristine").unwrap();
        (temp, ws, shared)
    }

    #[tokio::test]
    async fn copy_is_taken_once_per_destination() {
        let (_temp, ws, shared) = setup().await;
        let dest = ws.pkg_cache_root().join("v3.4").join("fetched-v18.5.0-win-x64");
        let mut copies = WorkingCopies::new();

        assert!(copies.take(&shared, &dest).await.unwrap());
        std::fs::write(&dest, b"patched").unwrap();
        assert!(!copies.take(&shared, &dest).await.unwrap());

        assert_eq!(copies.entries().len(), 1);
        assert_eq!(std::fs::read(&dest).unwrap(), b"patched");
        assert_eq!(std::fs::read(&shared).unwrap(), b"pristine");
    }

    #[tokio::test]
    async fn finish_removes_workspace() {
        let (_temp, ws, _shared) = setup().await;
        let errors = finish(&ws, false).await;
        assert!(errors.is_empty());
        assert!(!ws.root().exists());
    }

    #[tokio::test]
    async fn keep_tmp_preserves_workspace() {
        let (_temp, ws, _shared) = setup().await;
        let errors = finish(&ws, true).await;
        assert!(errors.is_empty());
        assert!(ws.root().exists());
    }

    #[tokio::test]
    async fn missing_shared_binary_is_not_registered() {
        let (temp, ws, _shared) = setup().await;
        let mut copies = WorkingCopies::new();
        let err = copies
            .take(&temp.path().join("absent"), &ws.root().join("copy"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::bundler::Error::MissingBinary(_)));
        assert!(copies.entries().is_empty());
    }
}
