//! Builder for constructing Settings.

use super::{MetaData, PkgSettings, Settings};
use crate::bundler::{
    error::{Context, Error, Result},
    fetch::{PKG_FETCH_TAG, PkgFetch},
};
use path_absolutize::Absolutize;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// Directory name used under the user cache and system temp directories.
pub const APP_DIR_NAME: &str = "kodegen_bundler_pkg";

/// Default deliverable directory when `pkg` is not configured.
pub const DEFAULT_OUT_DIR: &str = "dist";

/// Builder for constructing [`Settings`].
///
/// Every field is optional. Paths are made absolute against the current
/// directory on [`build`](Self::build); cache and scratch locations fall back
/// to platform defaults.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_pkg::bundler::SettingsBuilder;
///
/// # fn example() -> kodegen_bundler_pkg::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .targets(vec!["node18-win-x64".into(), "node18-linux-x64".into()])
///     .rc_entry("CompanyName", "Example Corp")
///     .keep_tmp(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug, Clone)]
pub struct SettingsBuilder {
    targets: Vec<String>,
    metadata: MetaData,
    rc_data: BTreeMap<String, String>,
    icon: Option<PathBuf>,
    rc_file_path: Option<PathBuf>,
    res_file_path: Option<PathBuf>,
    rh_path: Option<PathBuf>,
    pkg_cache_path: Option<PathBuf>,
    pkg_fetch_tag: Option<String>,
    cache_path: Option<PathBuf>,
    tmp_path: Option<PathBuf>,
    node_version: Option<String>,
    keep_tmp: bool,
    out_dir: Option<PathBuf>,
    pkg: Option<PkgSettings>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the target descriptors.
    ///
    /// Default: `["host"]`
    pub fn targets(mut self, targets: Vec<String>) -> Self {
        self.targets = targets;
        self
    }

    /// Sets program metadata.
    pub fn metadata(mut self, metadata: MetaData) -> Self {
        self.metadata = metadata;
        self
    }

    /// Fills metadata fields that are still unset (e.g. from package.json).
    pub fn metadata_defaults(mut self, defaults: &MetaData) -> Self {
        self.metadata.fill_missing(defaults);
        self
    }

    /// Replaces all raw resource field overrides.
    pub fn rc_data(mut self, rc_data: BTreeMap<String, String>) -> Self {
        self.rc_data = rc_data;
        self
    }

    /// Adds one raw resource field override.
    pub fn rc_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.rc_data.insert(key.into(), value.into());
        self
    }

    /// Sets the icon file or directory.
    pub fn icon<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.icon = Some(path.as_ref().to_path_buf());
        self
    }

    /// Uses a pre-built resource script instead of generating one.
    pub fn rc_file_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.rc_file_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Uses a pre-compiled resource blob instead of compiling the script.
    pub fn res_file_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.res_file_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Uses a caller-supplied resource editor instead of downloading one.
    pub fn rh_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.rh_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the base binary cache root.
    ///
    /// Default: `~/.pkg-cache`
    pub fn pkg_cache_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.pkg_cache_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the pkg-fetch release tag.
    ///
    /// Default: [`PKG_FETCH_TAG`]
    pub fn pkg_fetch_tag(mut self, tag: impl Into<String>) -> Self {
        self.pkg_fetch_tag = Some(tag.into());
        self
    }

    /// Sets the resource editor cache directory.
    ///
    /// Default: `<user cache dir>/kodegen_bundler_pkg`
    pub fn cache_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the parent directory for scratch workspaces.
    ///
    /// Default: `<system temp dir>/kodegen_bundler_pkg`
    pub fn tmp_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.tmp_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Overrides the host node range (e.g. `node18` or `18.5.0`).
    pub fn node_version(mut self, version: impl Into<String>) -> Self {
        self.node_version = Some(version.into());
        self
    }

    /// Keeps the scratch workspace after the run.
    pub fn keep_tmp(mut self, keep: bool) -> Self {
        self.keep_tmp = keep;
        self
    }

    /// Sets the deliverable directory used when `pkg` is not configured.
    ///
    /// Default: `dist`
    pub fn out_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.out_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables the build step.
    pub fn pkg(mut self, pkg: PkgSettings) -> Self {
        self.pkg = Some(pkg);
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a path cannot be made absolute or a default
    /// location (home, cache) cannot be determined.
    pub fn build(self) -> Result<Settings> {
        let pkg_cache_path = match self.pkg_cache_path {
            Some(path) => absolute(&path)?,
            None => PkgFetch::default_cache_root().context("no home directory for ~/.pkg-cache")?,
        };

        let cache_path = match self.cache_path {
            Some(path) => absolute(&path)?,
            None => dirs::cache_dir()
                .context("no user cache directory")?
                .join(APP_DIR_NAME),
        };

        let tmp_path = match self.tmp_path {
            Some(path) => absolute(&path)?,
            None => std::env::temp_dir().join(APP_DIR_NAME),
        };

        let out_dir = absolute(
            self.out_dir
                .as_deref()
                .unwrap_or_else(|| Path::new(DEFAULT_OUT_DIR)),
        )?;

        let pkg = match self.pkg {
            Some(pkg) => Some(PkgSettings {
                src: pkg.src.as_deref().map(absolute).transpose()?,
                out: pkg.out.as_deref().map(absolute).transpose()?,
                args: pkg.args,
                program: pkg.program,
            }),
            None => None,
        };

        Ok(Settings {
            targets: self.targets,
            metadata: self.metadata,
            rc_data: self.rc_data,
            icon: self.icon.as_deref().map(absolute).transpose()?,
            rc_file_path: self.rc_file_path.as_deref().map(absolute).transpose()?,
            res_file_path: self.res_file_path.as_deref().map(absolute).transpose()?,
            rh_path: self.rh_path.as_deref().map(absolute).transpose()?,
            pkg_cache_path,
            pkg_fetch_tag: self
                .pkg_fetch_tag
                .unwrap_or_else(|| PKG_FETCH_TAG.to_string()),
            cache_path,
            tmp_path,
            node_version: self.node_version,
            keep_tmp: self.keep_tmp,
            out_dir,
            pkg,
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    path.absolutize()
        .map(|p| p.into_owned())
        .map_err(|e| Error::Fs {
            context: "resolving absolute path",
            path: path.to_path_buf(),
            error: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_filled_in() {
        let settings = SettingsBuilder::new()
            .pkg_cache_path("/cache/pkg")
            .cache_path("/cache/rh")
            .build()
            .unwrap();

        assert!(settings.targets().is_empty());
        assert_eq!(settings.pkg_fetch_tag(), PKG_FETCH_TAG);
        assert!(settings.tmp_path().ends_with(APP_DIR_NAME));
        assert!(settings.out_dir().is_absolute());
        assert!(settings.out_dir().ends_with(DEFAULT_OUT_DIR));
        assert!(!settings.keep_tmp());
        assert!(settings.pkg().is_none());
        assert_eq!(settings.product_name(), "app");
    }

    #[test]
    fn relative_paths_become_absolute() {
        let settings = SettingsBuilder::new()
            .pkg_cache_path("/cache/pkg")
            .cache_path("/cache/rh")
            .icon("assets/icon.png")
            .pkg(PkgSettings {
                src: Some("index.js".into()),
                out: Some("dist/app.exe".into()),
                ..Default::default()
            })
            .build()
            .unwrap();

        assert!(settings.icon().unwrap().is_absolute());
        assert!(settings.icon().unwrap().ends_with("assets/icon.png"));
        let pkg = settings.pkg().unwrap();
        assert!(pkg.src.as_ref().unwrap().is_absolute());
        assert!(pkg.out.as_ref().unwrap().ends_with("dist/app.exe"));
    }

    #[test]
    fn rc_entries_accumulate() {
        let settings = SettingsBuilder::new()
            .pkg_cache_path("/cache/pkg")
            .cache_path("/cache/rh")
            .rc_entry("CompanyName", "Example")
            .rc_entry("FileVersion", "9.9.9.9")
            .build()
            .unwrap();
        assert_eq!(settings.rc_data().len(), 2);
        assert_eq!(settings.rc_data()["FileVersion"], "9.9.9.9");
    }
}
