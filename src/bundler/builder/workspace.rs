//! Per-run scratch workspace.

use crate::bundler::{
    Result,
    error::ErrorExt,
    fetch::cached_binary_path,
    target::{Arch, Platform},
};
use semver::Version;
use std::path::{Path, PathBuf};

/// Scratch directory owned by a single run.
///
/// Layout:
/// - `bin.rc` - generated resource script
/// - `bin.res` - compiled resource blob
/// - `pkg-cache/` - working copies of base binaries, laid out as a pkg-fetch
///   cache so `pkg` can be pointed at it
/// - `icon/` - icon renditions and the assembled `.ico`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Create a fresh, uniquely named directory under `tmp_base`.
    pub async fn create(tmp_base: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(tmp_base)
            .await
            .fs_context("creating scratch base directory", tmp_base)?;

        loop {
            let root = tmp_base.join(uuid::Uuid::new_v4().simple().to_string());
            match tokio::fs::create_dir(&root).await {
                Ok(()) => {
                    log::debug!("Created scratch workspace {}", root.display());
                    return Ok(Self { root });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e).fs_context("creating scratch workspace", &root),
            }
        }
    }

    /// Workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Generated resource script.
    pub fn rc_path(&self) -> PathBuf {
        self.root.join("bin.rc")
    }

    /// Compiled resource blob.
    pub fn res_path(&self) -> PathBuf {
        self.root.join("bin.res")
    }

    /// Icon rendition directory.
    pub fn icon_dir(&self) -> PathBuf {
        self.root.join("icon")
    }

    /// Root of the run's private pkg-fetch cache.
    pub fn pkg_cache_root(&self) -> PathBuf {
        self.root.join("pkg-cache")
    }

    /// Working copy location for a base binary.
    pub fn working_copy_path(
        &self,
        tag: &str,
        version: &Version,
        platform: Platform,
        arch: Arch,
    ) -> PathBuf {
        cached_binary_path(&self.pkg_cache_root(), tag, version, platform, arch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn workspaces_are_unique() {
        let temp = tempfile::tempdir().unwrap();
        let a = Workspace::create(temp.path()).await.unwrap();
        let b = Workspace::create(temp.path()).await.unwrap();
        assert_ne!(a.root(), b.root());
        assert!(a.root().is_dir());
        assert_eq!(a.root().parent(), Some(temp.path()));
    }

    #[tokio::test]
    async fn layout_is_rooted_in_workspace() {
        let temp = tempfile::tempdir().unwrap();
        let ws = Workspace::create(&temp.path().join("nested")).await.unwrap();
        assert!(ws.rc_path().ends_with("bin.rc"));
        assert!(ws.res_path().starts_with(ws.root()));
        assert_eq!(
            ws.working_copy_path("v3.4", &Version::new(18, 5, 0), Platform::Win, Arch::X64),
            ws.root()
                .join("pkg-cache")
                .join("v3.4")
                .join("fetched-v18.5.0-win-x64")
        );
    }
}
