//! Configuration file loading.
//!
//! A config file is TOML, or JSON when its extension is `.json`. Keys use
//! snake_case; the camelCase spellings (`metaData`, `rcData`, `keepTMP`, ...)
//! are accepted as aliases.

use crate::bundler::{MetaData, PkgSettings, SettingsBuilder};
use crate::error::{BundlerError, CliError, Result};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// One target or a list of targets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Targets {
    /// A single descriptor
    One(String),
    /// Several descriptors
    Many(Vec<String>),
}

impl Default for Targets {
    fn default() -> Self {
        Targets::Many(Vec::new())
    }
}

impl Targets {
    /// Descriptor list.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Targets::One(target) => vec![target],
            Targets::Many(targets) => targets,
        }
    }
}

/// Packaging configuration as read from disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PackagerConfig {
    /// Target descriptors
    #[serde(alias = "target")]
    pub targets: Targets,

    /// Program metadata
    #[serde(alias = "metaData")]
    pub metadata: MetaData,

    /// Raw resource overrides; `null` values are dropped
    #[serde(alias = "rcData")]
    pub rc_data: BTreeMap<String, Option<String>>,

    /// Icon file or directory
    pub icon: Option<PathBuf>,

    /// Pre-built resource script
    #[serde(alias = "rcFilePath")]
    pub rc_file_path: Option<PathBuf>,

    /// Pre-compiled resource blob
    #[serde(alias = "resFilePath")]
    pub res_file_path: Option<PathBuf>,

    /// Explicit Resource Hacker executable
    #[serde(alias = "rhPath")]
    pub rh_path: Option<PathBuf>,

    /// Base binary cache root
    #[serde(alias = "pkgCachePath")]
    pub pkg_cache_path: Option<PathBuf>,

    /// pkg-fetch release tag
    #[serde(alias = "pkgFetchTag")]
    pub pkg_fetch_tag: Option<String>,

    /// Resource Hacker cache
    #[serde(alias = "cachePath")]
    pub cache_path: Option<PathBuf>,

    /// Scratch workspace parent
    #[serde(alias = "tmpPath")]
    pub tmp_path: Option<PathBuf>,

    /// Host node range override
    #[serde(alias = "nodeVersion")]
    pub node_version: Option<String>,

    /// Keep the scratch workspace
    #[serde(alias = "keepTMP", alias = "keepTmp")]
    pub keep_tmp: bool,

    /// Deliverable directory without `pkg`
    #[serde(alias = "outDir")]
    pub out_dir: Option<PathBuf>,

    /// `pkg` invocation
    pub pkg: Option<PkgSettings>,
}

/// Load a config file, resolving its relative paths against the file's
/// directory.
pub fn load_config(path: &Path) -> Result<PackagerConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BundlerError::Cli(CliError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config: PackagerConfig = if is_json {
        serde_json::from_str(&content)?
    } else {
        toml::from_str(&content)?
    };

    log::debug!("Loaded config from {}", path.display());
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(config.relative_to(base))
}

impl PackagerConfig {
    /// Resolve relative paths against `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        let join = |p: &mut Option<PathBuf>| {
            if let Some(path) = p.as_mut() {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        };
        join(&mut self.icon);
        join(&mut self.rc_file_path);
        join(&mut self.res_file_path);
        join(&mut self.rh_path);
        join(&mut self.pkg_cache_path);
        join(&mut self.cache_path);
        join(&mut self.tmp_path);
        join(&mut self.out_dir);
        if let Some(pkg) = self.pkg.as_mut() {
            join(&mut pkg.src);
            join(&mut pkg.out);
        }
        self
    }

    /// Settings builder seeded from this config.
    pub fn into_builder(self) -> SettingsBuilder {
        let rc_data = self
            .rc_data
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect();

        let mut builder = SettingsBuilder::new()
            .targets(self.targets.into_vec())
            .metadata(self.metadata)
            .rc_data(rc_data)
            .keep_tmp(self.keep_tmp);

        if let Some(icon) = self.icon {
            builder = builder.icon(icon);
        }
        if let Some(rc) = self.rc_file_path {
            builder = builder.rc_file_path(rc);
        }
        if let Some(res) = self.res_file_path {
            builder = builder.res_file_path(res);
        }
        if let Some(rh) = self.rh_path {
            builder = builder.rh_path(rh);
        }
        if let Some(cache) = self.pkg_cache_path {
            builder = builder.pkg_cache_path(cache);
        }
        if let Some(tag) = self.pkg_fetch_tag {
            builder = builder.pkg_fetch_tag(tag);
        }
        if let Some(cache) = self.cache_path {
            builder = builder.cache_path(cache);
        }
        if let Some(tmp) = self.tmp_path {
            builder = builder.tmp_path(tmp);
        }
        if let Some(version) = self.node_version {
            builder = builder.node_version(version);
        }
        if let Some(out_dir) = self.out_dir {
            builder = builder.out_dir(out_dir);
        }
        if let Some(pkg) = self.pkg {
            builder = builder.pkg(pkg);
        }
        builder
    }
}
