//! Resource Hacker acquisition.
//!
//! Uses a caller-supplied executable when given, otherwise downloads and
//! extracts the official archive into the tool cache once.

use crate::bundler::{
    builder::tool_detection::WINE,
    error::{Error, Result},
    utils::{archive, fs, http},
};
use std::path::{Path, PathBuf};

/// Official Resource Hacker archive.
pub const RESOURCE_HACKER_URL: &str = "http://www.angusj.com/resourcehacker/resource_hacker.zip";

const ARCHIVE_NAME: &str = "rh.zip";
const EXTRACT_DIR: &str = "rh";
const EXE_NAME: &str = "ResourceHacker.exe";

/// A runnable Resource Hacker.
///
/// Windows executables are launched through `wine` on other hosts when it
/// is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHacker {
    exe: PathBuf,
    runner: Option<PathBuf>,
}

impl ResourceHacker {
    /// Wraps an editor executable, picking a runner for the host.
    pub fn new(exe: impl Into<PathBuf>) -> Self {
        let exe = exe.into();
        let is_windows_exe = exe
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"));
        let runner = if is_windows_exe && !cfg!(windows) {
            (*WINE).clone()
        } else {
            None
        };
        Self { exe, runner }
    }

    /// Path of the editor executable.
    pub fn exe(&self) -> &Path {
        &self.exe
    }

    /// Runner used to launch the executable, if any.
    pub fn runner(&self) -> Option<&Path> {
        self.runner.as_deref()
    }

    /// Base command with the runner applied.
    pub(super) fn command(&self) -> tokio::process::Command {
        match &self.runner {
            Some(runner) => {
                let mut cmd = tokio::process::Command::new(runner);
                cmd.arg(&self.exe);
                cmd
            }
            None => tokio::process::Command::new(&self.exe),
        }
    }
}

/// Where the extracted editor lives inside `cache_dir`.
pub fn cached_exe_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(EXTRACT_DIR).join(EXE_NAME)
}

/// Get the Resource Hacker toolset.
///
/// - `custom` is used verbatim when given.
/// - Otherwise `<cache_dir>/rh/ResourceHacker.exe` is reused if present.
/// - Otherwise `<cache_dir>/rh.zip` is downloaded (unless it already
///   exists) and extracted.
///
/// Concurrent runs sharing `cache_dir` are not guarded.
pub async fn get_resource_hacker(custom: Option<&Path>, cache_dir: &Path) -> Result<ResourceHacker> {
    if let Some(custom) = custom {
        log::debug!("Using resource editor at {}", custom.display());
        return Ok(ResourceHacker::new(custom));
    }

    let exe = cached_exe_path(cache_dir);
    if fs::exists(&exe).await {
        log::debug!("Resource editor cache hit: {}", exe.display());
        return Ok(ResourceHacker::new(exe));
    }

    let zip_path = cache_dir.join(ARCHIVE_NAME);
    if fs::exists(&zip_path).await {
        log::debug!("Reusing downloaded archive {}", zip_path.display());
    } else {
        log::info!("Fetching Resource Hacker...");
        http::download_to_file(RESOURCE_HACKER_URL, &zip_path).await?;
    }

    archive::extract_zip(&zip_path, &cache_dir.join(EXTRACT_DIR)).await?;

    if !fs::exists(&exe).await {
        return Err(Error::Fetch {
            what: "Resource Hacker".to_string(),
            reason: format!("{} missing from {}", EXE_NAME, zip_path.display()),
        });
    }

    Ok(ResourceHacker::new(exe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = std::fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, data) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }

    #[tokio::test]
    async fn custom_path_is_used_verbatim() {
        let tool = get_resource_hacker(Some(Path::new("/opt/rh/rh.sh")), Path::new("/nowhere"))
            .await
            .unwrap();
        assert_eq!(tool.exe(), Path::new("/opt/rh/rh.sh"));
        assert!(tool.runner().is_none());
    }

    #[tokio::test]
    async fn existing_archive_is_extracted_without_download() {
        let temp = tempfile::tempdir().unwrap();
        write_zip(&temp.path().join(ARCHIVE_NAME), &[(EXE_NAME, b"MZ")]);

        let tool = get_resource_hacker(None, temp.path()).await.unwrap();
        assert_eq!(tool.exe(), cached_exe_path(temp.path()));
        assert_eq!(std::fs::read(tool.exe()).unwrap(), b"MZ");
    }

    #[tokio::test]
    async fn archive_without_editor_is_fetch_error() {
        let temp = tempfile::tempdir().unwrap();
        write_zip(&temp.path().join(ARCHIVE_NAME), &[("readme.txt", b"hi")]);

        let err = get_resource_hacker(None, temp.path()).await.unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
    }

    #[tokio::test]
    async fn cached_editor_is_reused() {
        let temp = tempfile::tempdir().unwrap();
        let exe = cached_exe_path(temp.path());
        std::fs::create_dir_all(exe.parent().unwrap()).unwrap();
        std::fs::write(&exe, b"MZ").unwrap();

        let tool = get_resource_hacker(None, temp.path()).await.unwrap();
        assert_eq!(tool.exe(), exe);
    }
}
