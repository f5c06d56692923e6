//! `pkg` build invocation.
//!
//! Locates the packaging tool, derives its argument vector and runs it with
//! the run's scratch base binary cache exposed through `PKG_CACHE_PATH`.

use crate::bundler::{
    error::{Error, Result},
    settings::PkgSettings,
    target::Target,
};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Environment variable `pkg` reads its base binary cache root from.
pub const PKG_CACHE_ENV: &str = "PKG_CACHE_PATH";

/// Build the argument vector for `pkg`.
///
/// Raw `args` are passed verbatim. Otherwise:
/// `[src, --target, <t1,t2,..>, --output|--out-path, out]`, with
/// `--out-path` when building more than one target. Targets carry their
/// pinned node version when the fetch stage resolved one.
pub fn pkg_args(settings: &PkgSettings, targets: &[Target]) -> Result<Vec<OsString>> {
    if let Some(args) = &settings.args {
        return Ok(args.iter().map(OsString::from).collect());
    }

    let src = settings
        .src
        .as_deref()
        .ok_or_else(|| Error::Build("pkg.src is required when pkg.args is not given".into()))?;
    Ok(default_args(src, targets, settings.out.as_deref()))
}

/// Default argument vector for a source entry point and targets.
pub fn default_args(src: &Path, targets: &[Target], out: Option<&Path>) -> Vec<OsString> {
    let target_list = targets
        .iter()
        .map(Target::pkg_target)
        .collect::<Vec<_>>()
        .join(",");

    let mut args: Vec<OsString> = vec![src.into(), "--target".into(), target_list.into()];
    if let Some(out) = out {
        let flag = if targets.len() > 1 { "--out-path" } else { "--output" };
        args.push(flag.into());
        args.push(out.into());
    }
    args
}

/// How to launch `pkg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkgCommand {
    program: PathBuf,
    prefix: Vec<OsString>,
}

impl PkgCommand {
    /// Launch a specific executable.
    pub fn from_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            prefix: Vec::new(),
        }
    }

    /// Find `pkg` on `PATH`, falling back to `npx pkg`.
    pub fn locate() -> Result<Self> {
        if let Ok(pkg) = which::which("pkg") {
            log::debug!("Found pkg at: {}", pkg.display());
            return Ok(Self::from_program(pkg));
        }
        if let Ok(npx) = which::which("npx") {
            log::debug!("pkg not in PATH, using {} pkg", npx.display());
            return Ok(Self {
                program: npx,
                prefix: vec!["pkg".into()],
            });
        }
        Err(Error::Build(
            "pkg not found. Please install it (e.g., npm install -g pkg)".into(),
        ))
    }

    /// Run `pkg` with `args`, pointing it at `pkg_cache`.
    ///
    /// Non-zero exit becomes [`Error::Build`] carrying the captured stderr.
    pub async fn run(&self, args: &[OsString], pkg_cache: &Path) -> Result<()> {
        log::info!("Running pkg...");
        log::debug!(
            "{} {}",
            self.program.display(),
            self.prefix
                .iter()
                .chain(args)
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = tokio::process::Command::new(&self.program)
            .args(&self.prefix)
            .args(args)
            .env(PKG_CACHE_ENV, pkg_cache)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::CommandFailed {
                command: self.program.display().to_string(),
                error: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = if stderr.trim().is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr.into_owned()
            };
            return Err(Error::Build(detail));
        }

        Ok(())
    }
}

/// Run `pkg` for `targets` as configured.
///
/// `pkg_cache` is the cache root `pkg` resolves base binaries from.
pub async fn run_pkg(settings: &PkgSettings, targets: &[Target], pkg_cache: &Path) -> Result<()> {
    let args = pkg_args(settings, targets)?;
    let command = match &settings.program {
        Some(program) => PkgCommand::from_program(program),
        None => PkgCommand::locate()?,
    };
    command.run(&args, pkg_cache).await
}
