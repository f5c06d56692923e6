//! HTTP utilities for downloading external tools and base binaries.

use crate::bundler::error::{Error, ErrorExt, Result};
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Downloads a small text resource (patch lists, checksums).
///
/// Returns `Ok(None)` on HTTP 404 so callers can treat optional resources
/// as absent.
pub async fn download_text(url: &str) -> Result<Option<String>> {
    log::debug!("Fetching {}", url);

    let response = reqwest::get(url).await.map_err(|e| Error::Fetch {
        what: url.to_string(),
        reason: e.to_string(),
    })?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !response.status().is_success() {
        return Err(Error::Fetch {
            what: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let text = response.text().await.map_err(|e| Error::Fetch {
        what: url.to_string(),
        reason: format!("failed to read response: {}", e),
    })?;
    Ok(Some(text))
}

/// Streams a URL to `dest`.
///
/// Data is written to `<dest>.downloading` first and renamed into place once
/// complete, so an interrupted download never leaves a truncated file at
/// `dest`.
pub async fn download_to_file(url: &str, dest: &Path) -> Result<()> {
    log::info!("Downloading {}", url);

    let response = reqwest::get(url).await.map_err(|e| Error::Fetch {
        what: url.to_string(),
        reason: e.to_string(),
    })?;

    if !response.status().is_success() {
        return Err(Error::Fetch {
            what: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating download directory", parent)?;
    }

    let partial = partial_path(dest);
    let mut file = tokio::fs::File::create(&partial)
        .await
        .fs_context("creating download file", &partial)?;

    let mut stream = response.bytes_stream();
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                drop(file);
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(Error::Fetch {
                    what: url.to_string(),
                    reason: format!("download interrupted: {}", e),
                });
            }
        };
        file.write_all(&chunk)
            .await
            .fs_context("writing download", &partial)?;
        written += chunk.len() as u64;
    }
    file.flush().await.fs_context("flushing download", &partial)?;
    drop(file);

    tokio::fs::rename(&partial, dest)
        .await
        .fs_context("moving download into place", dest)?;

    log::debug!("Downloaded {} bytes to {}", written, dest.display());
    Ok(())
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".downloading");
    PathBuf::from(name)
}
