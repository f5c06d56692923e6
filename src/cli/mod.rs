//! Command line interface for the packager.
//!
//! Merges the config file, package.json and flags into [`Settings`], runs
//! the [`Packager`] and prints the produced artifacts.
//!
//! [`Settings`]: crate::bundler::Settings
//! [`Packager`]: crate::bundler::Packager

mod args;

pub use args::Args;

use crate::{
    bundler::{Packager, PkgSettings, SettingsBuilder},
    config::{PackagerConfig, load_config},
    error::{BundlerError, CliError, Result},
    metadata::load_package_json,
};

/// Main CLI entry point
pub async fn run(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| BundlerError::Cli(CliError::InvalidArguments { reason }))?;

    let builder = settings_builder(&args)?;
    let settings = builder.build()?;

    let report = Packager::with_pkg_fetch(settings).run().await?;

    for artifact in &report.artifacts {
        println!(
            "{}\t{} bytes\tsha256:{}",
            artifact.path.display(),
            artifact.size,
            artifact.checksum
        );
    }
    for warning in &report.cleanup_warnings {
        eprintln!("warning: {}", warning);
    }

    Ok(0)
}

/// Build settings from config, package.json and flags (highest precedence).
pub fn settings_builder(args: &Args) -> Result<SettingsBuilder> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => PackagerConfig::default(),
    };

    let package = load_package_json(&args.project)?;
    if let Some(package) = &package {
        config.metadata.fill_missing(&package.to_metadata());
    }

    // Flags that describe the pkg invocation enable the build step.
    if args.src.is_some() || args.out.is_some() || args.pkg_path.is_some() {
        let pkg = config.pkg.get_or_insert_with(PkgSettings::default);
        if let Some(src) = &args.src {
            pkg.src = Some(src.clone());
        }
        if let Some(out) = &args.out {
            pkg.out = Some(out.clone());
        }
        if let Some(program) = &args.pkg_path {
            pkg.program = Some(program.clone());
        }
    }
    if let Some(pkg) = config.pkg.as_mut() {
        if pkg.src.is_none() && pkg.args.is_none() {
            pkg.src = package
                .as_ref()
                .and_then(|p| p.entry.clone())
                .or_else(|| Some(args.project.clone()));
        }
    }

    let mut builder = config.into_builder();
    if !args.targets.is_empty() {
        builder = builder.targets(args.targets.clone());
    }
    if let Some(icon) = &args.icon {
        builder = builder.icon(icon);
    }
    if let Some(rh) = &args.rh_path {
        builder = builder.rh_path(rh);
    }
    if let Some(cache) = &args.pkg_cache_path {
        builder = builder.pkg_cache_path(cache);
    }
    if let Some(version) = &args.node_version {
        builder = builder.node_version(version.clone());
    }
    if let Some(out_dir) = &args.out_dir {
        builder = builder.out_dir(out_dir);
    }
    if let Some(tmp) = &args.tmp_path {
        builder = builder.tmp_path(tmp);
    }
    if args.keep_tmp {
        builder = builder.keep_tmp(true);
    }
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["kodegen_bundler_pkg"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn package_json_fills_metadata_and_entry() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join("package.json"),
            r#"{"name": "demo", "version": "2.0.0", "main": "app.js"}"#,
        )
        .unwrap();
        let project = temp.path().to_string_lossy().into_owned();

        let settings = settings_builder(&args(&[
            "--project",
            &project,
            "--out",
            "dist/demo.exe",
            "--pkg-cache-path",
            "/cache/pkg",
        ]))
        .unwrap()
        .cache_path("/cache/rh")
        .build()
        .unwrap();

        assert_eq!(settings.metadata().name.as_deref(), Some("demo"));
        assert_eq!(settings.metadata().version.as_deref(), Some("2.0.0"));
        let pkg = settings.pkg().unwrap();
        assert_eq!(pkg.src.as_deref(), Some(temp.path().join("app.js").as_path()));
    }

    #[test]
    fn flags_override_config() {
        let temp = tempfile::tempdir().unwrap();
        let config = temp.path().join("packager.json");
        std::fs::write(
            &config,
            r#"{"targets": ["node16-win-x64"], "metaData": {"name": "fromconfig"}}"#,
        )
        .unwrap();
        let config = config.to_string_lossy().into_owned();
        let project = temp.path().to_string_lossy().into_owned();

        let settings = settings_builder(&args(&[
            "--config",
            &config,
            "--project",
            &project,
            "-t",
            "node18-win-x64",
            "--keep-tmp",
            "--pkg-cache-path",
            "/cache/pkg",
        ]))
        .unwrap()
        .cache_path("/cache/rh")
        .build()
        .unwrap();

        assert_eq!(settings.targets(), ["node18-win-x64"]);
        assert_eq!(settings.metadata().name.as_deref(), Some("fromconfig"));
        assert!(settings.keep_tmp());
        assert!(settings.pkg().is_none());
    }

    #[test]
    fn pkg_path_enables_build_with_that_program() {
        let temp = tempfile::tempdir().unwrap();
        let project = temp.path().to_string_lossy().into_owned();

        let settings = settings_builder(&args(&[
            "--project",
            &project,
            "--pkg-path",
            "/opt/node/bin/pkg",
            "--pkg-cache-path",
            "/cache/pkg",
        ]))
        .unwrap()
        .cache_path("/cache/rh")
        .build()
        .unwrap();

        let pkg = settings.pkg().unwrap();
        assert_eq!(pkg.program.as_deref(), Some(std::path::Path::new("/opt/node/bin/pkg")));
        assert!(pkg.src.is_some());
    }
}
