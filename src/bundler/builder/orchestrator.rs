//! Main packaging orchestration.
//!
//! This module provides the [`Packager`] that drives a run through target
//! resolution, dependency fetching, resource generation and injection, the
//! `pkg` build and cleanup.

use super::{
    cleanup::{self, WorkingCopies},
    workspace::Workspace,
};
use crate::bundler::{
    CleanupError, Result, Settings,
    error::{Context, ErrorExt},
    fetch::{BinaryFetcher, FetchedBinary, PkgFetch},
    icon,
    pkg::run_pkg,
    resource::{self, ResourceFields, ResourceHacker, ResourceScript},
    settings::PkgSettings,
    target::{HostInfo, RuntimeDescriptor, Target, resolve_targets},
    utils::{checksum::calculate_sha256, fs},
};
use futures_util::future::try_join_all;
use std::{collections::HashMap, path::PathBuf};

/// A deliverable produced by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedArtifact {
    /// Path of the deliverable
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Hex SHA-256
    pub checksum: String,
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct PackageReport {
    /// Resolved targets, with base binaries and working copies filled in
    pub targets: Vec<Target>,
    /// Deliverables that exist after the run
    pub artifacts: Vec<PackagedArtifact>,
    /// Cleanup problems (scratch workspace not removed)
    pub cleanup_warnings: Vec<CleanupError>,
}

/// Main packaging orchestrator.
///
/// Base binaries come from the injected [`BinaryFetcher`];
/// [`Packager::with_pkg_fetch`] wires the on-disk pkg-fetch cache described
/// by the settings.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_pkg::bundler::{Packager, SettingsBuilder};
///
/// # async fn example() -> kodegen_bundler_pkg::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .targets(vec!["node18-win-x64".into()])
///     .build()?;
///
/// let report = Packager::with_pkg_fetch(settings).run().await?;
/// for artifact in &report.artifacts {
///     println!("Created: {} ({} bytes)", artifact.path.display(), artifact.size);
///     println!("SHA256: {}", artifact.checksum);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Packager<F: BinaryFetcher = PkgFetch> {
    settings: Settings,
    fetcher: F,
}

impl Packager<PkgFetch> {
    /// Packager backed by the pkg-fetch cache at the configured location.
    pub fn with_pkg_fetch(settings: Settings) -> Self {
        let fetcher = PkgFetch::new(settings.pkg_cache_path(), settings.pkg_fetch_tag());
        Self::new(settings, fetcher)
    }
}

impl<F: BinaryFetcher> Packager<F> {
    /// Creates a packager with an explicit base binary source.
    pub fn new(settings: Settings, fetcher: F) -> Self {
        Self { settings, fetcher }
    }

    /// Returns a reference to the packager settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs the whole pipeline.
    ///
    /// Shared base binaries are only read; every mutation happens on working
    /// copies inside the scratch workspace. Once the workspace exists it is
    /// removed (unless kept) whatever the outcome. Cleanup problems are
    /// logged and never replace the primary error.
    pub async fn run(&self) -> Result<PackageReport> {
        log::info!("Resolving targets...");
        let host = HostInfo::detect(self.settings.node_version()).await?;
        let mut targets = resolve_targets(self.settings.targets(), &host)?;
        for target in &targets {
            log::info!("  {} -> {}", target.name, target.descriptor);
        }

        let workspace = Workspace::create(self.settings.tmp_path()).await?;

        let result = self.run_stages(&workspace, &mut targets).await;
        let cleanup_warnings = cleanup::finish(&workspace, self.settings.keep_tmp()).await;

        let artifacts = result?;
        log::info!("✓ Packaged {} artifacts", artifacts.len());
        Ok(PackageReport {
            targets,
            artifacts,
            cleanup_warnings,
        })
    }

    async fn run_stages(
        &self,
        workspace: &Workspace,
        targets: &mut [Target],
    ) -> Result<Vec<PackagedArtifact>> {
        let needs_resources = targets.iter().any(Target::is_windows);
        if !needs_resources {
            log::info!("No Windows targets, skipping resource editing");
        }

        let (tool, fetched, icon) = tokio::try_join!(
            self.acquire_editor(needs_resources),
            self.fetch_binaries(targets),
            self.prepare_icon(workspace, needs_resources),
        )?;
        for (target, binary) in targets.iter_mut().zip(fetched) {
            target.base_binary = Some(binary.path);
            target.node_version = Some(binary.version);
        }

        let fresh = self.take_working_copies(workspace, targets).await?;

        if let Some(tool) = tool {
            let res_path = self.compile_resources(&tool, workspace).await?;
            for copy in &fresh {
                resource::patch_binary(&tool, copy, &res_path, icon.as_deref()).await?;
            }
        }

        let deliverables = match self.settings.pkg() {
            Some(pkg) => {
                run_pkg(pkg, targets, &workspace.pkg_cache_root()).await?;
                pkg_outputs(pkg, targets).await
            }
            None => self.copy_deliverables(targets).await?,
        };

        describe_artifacts(deliverables).await
    }

    async fn acquire_editor(&self, needed: bool) -> Result<Option<ResourceHacker>> {
        if !needed {
            return Ok(None);
        }
        resource::get_resource_hacker(self.settings.rh_path(), self.settings.cache_path())
            .await
            .map(Some)
    }

    /// Fetch one base binary per distinct descriptor, then hand each
    /// target its entry.
    async fn fetch_binaries(&self, targets: &[Target]) -> Result<Vec<FetchedBinary>> {
        log::info!("Fetching base binaries...");
        let mut unique: Vec<&RuntimeDescriptor> = Vec::new();
        for target in targets {
            if !unique.contains(&&target.descriptor) {
                unique.push(&target.descriptor);
            }
        }

        let fetched = try_join_all(unique.iter().map(|d| self.fetcher.need(d))).await?;
        let by_descriptor: HashMap<_, _> = unique.into_iter().zip(fetched).collect();

        targets
            .iter()
            .map(|target| {
                by_descriptor
                    .get(&target.descriptor)
                    .cloned()
                    .context(format!("no base binary fetched for {}", target.name))
            })
            .collect()
    }

    async fn prepare_icon(&self, workspace: &Workspace, needed: bool) -> Result<Option<PathBuf>> {
        match self.settings.icon() {
            Some(source) if needed => icon::prepare_icon(source, &workspace.icon_dir())
                .await
                .map(Some),
            _ => Ok(None),
        }
    }

    /// Produce the `.res` blob: supplied as is, or compiled from a supplied
    /// or generated script.
    async fn compile_resources(&self, tool: &ResourceHacker, workspace: &Workspace) -> Result<PathBuf> {
        if let Some(res) = self.settings.res_file_path() {
            log::info!("Using pre-compiled resources {}", res.display());
            return Ok(res.to_path_buf());
        }

        let rc_path = match self.settings.rc_file_path() {
            Some(rc) => {
                log::info!("Using resource script {}", rc.display());
                rc.to_path_buf()
            }
            None => {
                log::info!("Generating resource script...");
                let fields = ResourceFields::derive(self.settings.metadata(), self.settings.rc_data());
                for (key, value) in fields.iter() {
                    log::debug!("  {key} = {value}");
                }
                let rc_path = workspace.rc_path();
                ResourceScript::from_fields(&fields).write(&rc_path).await?;
                rc_path
            }
        };

        let res_path = workspace.res_path();
        resource::compile_script(tool, &rc_path, &res_path).await?;
        Ok(res_path)
    }

    /// Copy base binaries into the workspace's pkg cache.
    ///
    /// Windows targets always get a working copy since they are patched.
    /// Other targets only need one when `pkg` reads from the workspace
    /// cache. Returns the Windows copies made by this call, one per distinct
    /// destination, so duplicate targets are patched once.
    async fn take_working_copies(
        &self,
        workspace: &Workspace,
        targets: &mut [Target],
    ) -> Result<Vec<PathBuf>> {
        let stage_all = self.settings.pkg().is_some();
        let mut copies = WorkingCopies::new();
        let mut fresh = Vec::new();

        for target in targets.iter_mut() {
            if !target.is_windows() && !stage_all {
                continue;
            }
            let base = target
                .base_binary
                .clone()
                .context(format!("no base binary fetched for {}", target.name))?;
            let version = target
                .node_version
                .clone()
                .context(format!("no node version resolved for {}", target.name))?;

            let copy = workspace.working_copy_path(
                self.settings.pkg_fetch_tag(),
                &version,
                target.descriptor.platform,
                target.descriptor.arch,
            );
            if copies.take(&base, &copy).await? && target.is_windows() {
                fresh.push(copy.clone());
            }
            target.working_copy = Some(copy);
        }
        Ok(fresh)
    }

    /// Without `pkg`, the binaries themselves are the deliverables: patched
    /// working copies for Windows targets, base binaries otherwise.
    async fn copy_deliverables(&self, targets: &[Target]) -> Result<Vec<PathBuf>> {
        let out_dir = self.settings.out_dir();
        fs::create_dir_all(out_dir, false).await?;

        let mut outputs = Vec::with_capacity(targets.len());
        for target in targets {
            let source = target
                .working_copy
                .as_deref()
                .or(target.base_binary.as_deref())
                .context(format!("no base binary fetched for {}", target.name))?;
            let dest = out_dir.join(target.output_file_name(self.settings.product_name()));
            fs::copy_file(source, &dest).await?;
            if !target.is_windows() {
                fs::make_executable(&dest).await?;
            }
            log::info!("Created {}", dest.display());
            if !outputs.contains(&dest) {
                outputs.push(dest);
            }
        }
        Ok(outputs)
    }
}

/// Files `pkg` was asked to produce.
///
/// A single target writes `out` itself; several targets write into the
/// `out` directory. Raw argument vectors are opaque and report nothing.
async fn pkg_outputs(pkg: &PkgSettings, targets: &[Target]) -> Vec<PathBuf> {
    let Some(out) = pkg.out.as_deref().filter(|_| pkg.args.is_none()) else {
        return Vec::new();
    };
    if targets.len() <= 1 {
        return vec![out.to_path_buf()];
    }

    let mut outputs = Vec::new();
    if let Ok(mut entries) = tokio::fs::read_dir(out).await {
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.is_file() {
                outputs.push(path);
            }
        }
    }
    outputs.sort();
    outputs
}

async fn describe_artifacts(paths: Vec<PathBuf>) -> Result<Vec<PackagedArtifact>> {
    let mut artifacts = Vec::with_capacity(paths.len());
    for path in paths {
        if !fs::exists(&path).await {
            log::warn!("Expected output {} was not produced", path.display());
            continue;
        }
        let size = tokio::fs::metadata(&path)
            .await
            .fs_context("reading artifact metadata", &path)?
            .len();
        let checksum = calculate_sha256(&path).await?;
        artifacts.push(PackagedArtifact {
            path,
            size,
            checksum,
        });
    }
    Ok(artifacts)
}
