//! On-disk pkg-fetch cache with download on miss.
//!
//! Cache layout matches the one `pkg` itself reads:
//! `<root>/<tag>/fetched-v<version>-<platform>-<arch>`. Binaries are
//! downloaded from the pkg-fetch GitHub releases for the configured tag.

use super::{BinaryFetcher, FetchedBinary};
use crate::bundler::{
    error::{Error, Result},
    target::{Arch, NodeRange, Platform, RuntimeDescriptor},
    utils::{checksum, fs, http},
};
use semver::Version;
use std::path::{Path, PathBuf};

/// Default pkg-fetch release tag (also the cache subdirectory name).
pub const PKG_FETCH_TAG: &str = "v3.4";

const RELEASES_URL: &str = "https://github.com/vercel/pkg-fetch/releases/download";
const PATCHES_URL: &str =
    "https://raw.githubusercontent.com/vercel/pkg-fetch/main/patches/patches.json";
const FETCHED_PREFIX: &str = "fetched-v";

/// Location of a base binary inside a pkg-fetch cache rooted at `root`.
pub fn cached_binary_path(
    root: &Path,
    tag: &str,
    version: &Version,
    platform: Platform,
    arch: Arch,
) -> PathBuf {
    root.join(tag)
        .join(format!("{FETCHED_PREFIX}{}-{}-{}", version, platform, arch))
}

/// pkg-fetch compatible base binary cache.
#[derive(Clone, Debug)]
pub struct PkgFetch {
    cache_root: PathBuf,
    tag: String,
    releases_url: String,
    patches_url: String,
}

impl PkgFetch {
    /// Creates a fetcher over `cache_root` for a release tag.
    pub fn new(cache_root: impl Into<PathBuf>, tag: impl Into<String>) -> Self {
        Self {
            cache_root: cache_root.into(),
            tag: tag.into(),
            releases_url: RELEASES_URL.to_string(),
            patches_url: PATCHES_URL.to_string(),
        }
    }

    /// Points downloads at a mirror instead of GitHub.
    pub fn with_mirror(mut self, releases_url: String, patches_url: String) -> Self {
        self.releases_url = releases_url;
        self.patches_url = patches_url;
        self
    }

    /// `~/.pkg-cache`, the location `pkg` uses by default.
    pub fn default_cache_root() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".pkg-cache"))
    }

    /// Directory holding this tag's binaries.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_root.join(&self.tag)
    }

    /// Cache path for a concrete version.
    pub fn binary_path(&self, version: &Version, platform: Platform, arch: Arch) -> PathBuf {
        cached_binary_path(&self.cache_root, &self.tag, version, platform, arch)
    }

    fn remote_url(&self, version: &Version, platform: Platform, arch: Arch) -> String {
        format!(
            "{}/{}/node-v{}-{}-{}",
            self.releases_url, self.tag, version, platform, arch
        )
    }

    /// Versions already cached for a platform/arch pair.
    async fn cached_versions(&self, platform: Platform, arch: Arch) -> Vec<Version> {
        let dir = self.cache_dir();
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let suffix = format!("-{}-{}", platform, arch);
        let mut versions = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(version) = parse_cached_name(name, &suffix) {
                versions.push(version);
            }
        }
        versions
    }

    /// Versions published by pkg-fetch, from its patch list.
    async fn remote_versions(&self) -> Result<Vec<Version>> {
        let text = http::download_text(&self.patches_url)
            .await?
            .ok_or_else(|| Error::Fetch {
                what: self.patches_url.clone(),
                reason: "patch list not found".to_string(),
            })?;
        parse_patch_list(&text)
    }

    async fn resolve_version(&self, descriptor: &RuntimeDescriptor) -> Result<Version> {
        let range = &descriptor.node_range;
        if let Some(exact) = range.exact_version() {
            return Ok(exact);
        }

        let cached = self
            .cached_versions(descriptor.platform, descriptor.arch)
            .await;
        if let Some(version) = highest_match(range, cached) {
            log::debug!("{} satisfied by cached v{}", descriptor, version);
            return Ok(version);
        }

        let remote = self.remote_versions().await?;
        highest_match(range, remote).ok_or_else(|| Error::Fetch {
            what: format!("base binary {}", descriptor),
            reason: format!("no published node version satisfies {}", range),
        })
    }

    async fn download(
        &self,
        version: &Version,
        descriptor: &RuntimeDescriptor,
        dest: &Path,
    ) -> Result<()> {
        let url = self.remote_url(version, descriptor.platform, descriptor.arch);
        http::download_to_file(&url, dest).await?;

        match http::download_text(&format!("{url}.sha256sum")).await {
            Ok(Some(text)) => {
                if let Some(expected) = checksum::parse_sha256sum(&text) {
                    let actual = checksum::calculate_sha256(dest).await?;
                    if actual != expected {
                        let _ = tokio::fs::remove_file(dest).await;
                        return Err(Error::Fetch {
                            what: url,
                            reason: format!(
                                "checksum mismatch (expected {}, got {})",
                                expected, actual
                            ),
                        });
                    }
                    log::debug!("Verified checksum of {}", dest.display());
                }
            }
            Ok(None) => log::debug!("No published checksum for {}", url),
            Err(e) => log::debug!("Checksum lookup for {} failed: {}", url, e),
        }

        fs::make_executable(dest).await
    }
}

impl BinaryFetcher for PkgFetch {
    async fn need(&self, descriptor: &RuntimeDescriptor) -> Result<FetchedBinary> {
        let version = self.resolve_version(descriptor).await?;
        let path = self.binary_path(&version, descriptor.platform, descriptor.arch);

        if fs::exists(&path).await {
            log::debug!("Base binary cache hit: {}", path.display());
        } else {
            log::info!("Fetching base binary v{} for {}", version, descriptor);
            self.download(&version, descriptor, &path).await?;
        }
        Ok(FetchedBinary { path, version })
    }
}

fn parse_cached_name(name: &str, suffix: &str) -> Option<Version> {
    let version = name.strip_prefix(FETCHED_PREFIX)?.strip_suffix(suffix)?;
    Version::parse(version).ok()
}

fn parse_patch_list(text: &str) -> Result<Vec<Version>> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let object = value.as_object().ok_or_else(|| Error::Fetch {
        what: "pkg-fetch patch list".to_string(),
        reason: "expected a JSON object keyed by node version".to_string(),
    })?;

    Ok(object
        .keys()
        .filter_map(|key| Version::parse(key.trim_start_matches('v')).ok())
        .collect())
}

fn highest_match(range: &NodeRange, versions: Vec<Version>) -> Option<Version> {
    versions.into_iter().filter(|v| range.matches(v)).max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(range: &str) -> RuntimeDescriptor {
        RuntimeDescriptor {
            node_range: NodeRange::parse(range).unwrap(),
            platform: Platform::Win,
            arch: Arch::X64,
        }
    }

    #[test]
    fn binary_path_uses_pkg_layout() {
        let fetch = PkgFetch::new("/home/u/.pkg-cache", "v3.4");
        assert_eq!(
            fetch.binary_path(&Version::new(18, 5, 0), Platform::Win, Arch::X64),
            PathBuf::from("/home/u/.pkg-cache/v3.4/fetched-v18.5.0-win-x64")
        );
        assert_eq!(
            fetch.remote_url(&Version::new(18, 5, 0), Platform::Win, Arch::X64),
            "https://github.com/vercel/pkg-fetch/releases/download/v3.4/node-v18.5.0-win-x64"
        );
    }

    #[test]
    fn cached_names_parse_only_matching_pairs() {
        assert_eq!(
            parse_cached_name("fetched-v18.5.0-win-x64", "-win-x64"),
            Some(Version::new(18, 5, 0))
        );
        assert_eq!(parse_cached_name("fetched-v18.5.0-linux-x64", "-win-x64"), None);
        assert_eq!(
            parse_cached_name("fetched-v18.5.0-win-x64.downloading", "-win-x64"),
            None
        );
    }

    #[test]
    fn patch_list_keys_become_versions() {
        let text = r#"{"v16.16.0": ["node.v16.16.0.cpp.patch"], "v18.5.0": [], "junk": []}"#;
        let mut versions = parse_patch_list(text).unwrap();
        versions.sort();
        assert_eq!(versions, vec![Version::new(16, 16, 0), Version::new(18, 5, 0)]);
    }

    #[test]
    fn highest_match_respects_range() {
        let versions = vec![
            Version::new(16, 16, 0),
            Version::new(18, 5, 0),
            Version::new(18, 15, 0),
        ];
        let range = NodeRange::parse("node18").unwrap();
        assert_eq!(highest_match(&range, versions.clone()), Some(Version::new(18, 15, 0)));
        let latest = NodeRange::parse("latest").unwrap();
        assert_eq!(highest_match(&latest, versions), Some(Version::new(18, 15, 0)));
    }

    #[tokio::test]
    async fn exact_version_cache_hit_skips_network() {
        let temp = tempfile::tempdir().unwrap();
        let fetch = PkgFetch::new(temp.path(), "v3.4")
            .with_mirror("http://127.0.0.1:9".into(), "http://127.0.0.1:9/p.json".into());
        let cached = fetch.binary_path(&Version::new(18, 5, 0), Platform::Win, Arch::X64);
        std::fs::create_dir_all(cached.parent().unwrap()).unwrap();
        std::fs::write(&cached, b"MZ").unwrap();

        let fetched = fetch.need(&descriptor("node18.5.0")).await.unwrap();
        assert_eq!(fetched.path, cached);
        assert_eq!(fetched.version, Version::new(18, 5, 0));
    }

    #[tokio::test]
    async fn major_range_prefers_highest_cached_version() {
        let temp = tempfile::tempdir().unwrap();
        let fetch = PkgFetch::new(temp.path(), "v3.4")
            .with_mirror("http://127.0.0.1:9".into(), "http://127.0.0.1:9/p.json".into());
        let dir = fetch.cache_dir();
        std::fs::create_dir_all(&dir).unwrap();
        for name in [
            "fetched-v18.5.0-win-x64",
            "fetched-v18.15.0-win-x64",
            "fetched-v20.1.0-win-x64",
            "fetched-v18.20.0-linux-x64",
        ] {
            std::fs::write(dir.join(name), b"MZ").unwrap();
        }

        let fetched = fetch.need(&descriptor("node18")).await.unwrap();
        assert_eq!(fetched.path, dir.join("fetched-v18.15.0-win-x64"));
        assert_eq!(fetched.version, Version::new(18, 15, 0));
    }
}
