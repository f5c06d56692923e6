//! Zip archive extraction.

use crate::bundler::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Extracts every entry of a zip archive into `dest`.
///
/// Entries whose names would escape `dest` are skipped. Runs on the blocking
/// pool since the `zip` crate is synchronous.
pub async fn extract_zip(archive: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let archive = archive.to_path_buf();
    let dest = dest.to_path_buf();

    tokio::task::spawn_blocking(move || extract_zip_blocking(&archive, &dest))
        .await
        .map_err(|e| Error::GenericError(format!("zip extraction task panicked: {}", e)))?
}

fn extract_zip_blocking(archive: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let file = std::fs::File::open(archive).map_err(|e| Error::Fetch {
        what: archive.display().to_string(),
        reason: format!("cannot open archive: {}", e),
    })?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| Error::Fetch {
        what: archive.display().to_string(),
        reason: format!("not a valid zip archive: {}", e),
    })?;

    std::fs::create_dir_all(dest)?;

    let mut extracted = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            log::warn!("Skipping unsafe zip entry {}", entry.name());
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = std::fs::File::create(&out_path)?;
        std::io::copy(&mut entry, &mut out)?;
        extracted.push(out_path);
    }

    log::debug!(
        "Extracted {} files from {} into {}",
        extracted.len(),
        archive.display(),
        dest.display()
    );
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_zip(path: &Path, files: &[(&str, &[u8])]) {
        let file = std::fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, data) in files {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }

    #[tokio::test]
    async fn extracts_nested_entries() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("rh.zip");
        write_zip(
            &archive,
            &[("ResourceHacker.exe", b"MZ"), ("help/readme.txt", b"hi")],
        );

        let out = temp.path().join("rh");
        let files = extract_zip(&archive, &out).await.unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(std::fs::read(out.join("ResourceHacker.exe")).unwrap(), b"MZ");
        assert_eq!(std::fs::read(out.join("help/readme.txt")).unwrap(), b"hi");
    }

    #[tokio::test]
    async fn corrupt_archive_is_fetch_error() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("rh.zip");
        std::fs::write(&archive, b"not a zip").unwrap();

        let err = extract_zip(&archive, &temp.path().join("rh")).await.unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
    }
}
