//! Core Settings struct and implementations.

use super::{MetaData, PkgSettings};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// Main settings for a packaging run.
///
/// Central configuration for the packager, constructed via [`SettingsBuilder`].
/// All paths are absolute once built.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_pkg::bundler::{MetaData, PkgSettings, SettingsBuilder};
///
/// # fn example() -> kodegen_bundler_pkg::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .targets(vec!["node18-win-x64".into()])
///     .metadata(MetaData {
///         name: Some("myapp".into()),
///         version: Some("1.0.0".into()),
///         ..Default::default()
///     })
///     .icon("assets/icon.png")
///     .pkg(PkgSettings {
///         src: Some("index.js".into()),
///         out: Some("dist/myapp.exe".into()),
///         ..Default::default()
///     })
///     .build()?;
/// # Ok(())
/// # }
/// ```
///
/// # See Also
///
/// - [`SettingsBuilder`] - Builder for constructing Settings
/// - [`MetaData`] - Program metadata
/// - [`PkgSettings`] - Packaging tool invocation
///
/// [`SettingsBuilder`]: super::SettingsBuilder
#[derive(Clone, Debug)]
pub struct Settings {
    /// Target descriptors. Empty means `host`.
    pub(super) targets: Vec<String>,

    /// Program metadata for derived resource fields.
    pub(super) metadata: MetaData,

    /// Raw resource field overrides (highest precedence).
    pub(super) rc_data: BTreeMap<String, String>,

    /// Icon file or directory of sized images.
    pub(super) icon: Option<PathBuf>,

    /// Pre-built resource script (skips generation).
    pub(super) rc_file_path: Option<PathBuf>,

    /// Pre-compiled resource blob (skips compilation).
    pub(super) res_file_path: Option<PathBuf>,

    /// Caller-supplied resource editor (skips download).
    pub(super) rh_path: Option<PathBuf>,

    /// Root of the shared base binary cache.
    pub(super) pkg_cache_path: PathBuf,

    /// pkg-fetch release tag / cache subdirectory.
    pub(super) pkg_fetch_tag: String,

    /// Cache for the downloaded resource editor.
    pub(super) cache_path: PathBuf,

    /// Parent directory for per-run scratch workspaces.
    pub(super) tmp_path: PathBuf,

    /// Host node range override.
    pub(super) node_version: Option<String>,

    /// Keep the scratch workspace after the run.
    pub(super) keep_tmp: bool,

    /// Deliverable directory used when `pkg` is not configured.
    pub(super) out_dir: PathBuf,

    /// Packaging tool invocation. `None` skips the build step.
    pub(super) pkg: Option<PkgSettings>,
}

impl Settings {
    /// Returns the target descriptors.
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Returns the program metadata.
    pub fn metadata(&self) -> &MetaData {
        &self.metadata
    }

    /// Returns the raw resource field overrides.
    pub fn rc_data(&self) -> &BTreeMap<String, String> {
        &self.rc_data
    }

    /// Returns the icon source, if any.
    pub fn icon(&self) -> Option<&Path> {
        self.icon.as_deref()
    }

    /// Returns the pre-built resource script, if any.
    pub fn rc_file_path(&self) -> Option<&Path> {
        self.rc_file_path.as_deref()
    }

    /// Returns the pre-compiled resource blob, if any.
    pub fn res_file_path(&self) -> Option<&Path> {
        self.res_file_path.as_deref()
    }

    /// Returns the caller-supplied resource editor, if any.
    pub fn rh_path(&self) -> Option<&Path> {
        self.rh_path.as_deref()
    }

    /// Returns the base binary cache root.
    pub fn pkg_cache_path(&self) -> &Path {
        &self.pkg_cache_path
    }

    /// Returns the pkg-fetch release tag.
    pub fn pkg_fetch_tag(&self) -> &str {
        &self.pkg_fetch_tag
    }

    /// Returns the resource editor cache directory.
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Returns the scratch workspace parent directory.
    pub fn tmp_path(&self) -> &Path {
        &self.tmp_path
    }

    /// Returns the host node range override.
    pub fn node_version(&self) -> Option<&str> {
        self.node_version.as_deref()
    }

    /// Whether the scratch workspace is kept.
    pub fn keep_tmp(&self) -> bool {
        self.keep_tmp
    }

    /// Returns the deliverable directory used without `pkg`.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Returns the packaging tool settings, if the build step is enabled.
    pub fn pkg(&self) -> Option<&PkgSettings> {
        self.pkg.as_ref()
    }

    /// Base name for deliverables: the program name, or `app`.
    pub fn product_name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or("app")
    }
}
