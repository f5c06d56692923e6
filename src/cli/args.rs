//! Command line argument parsing and validation.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Package a Node.js program into executables with custom Windows resources
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_pkg",
    version,
    about = "Package Node.js programs into executables with custom Windows resources",
    long_about = "Packages a Node.js program with pkg after injecting version info and an icon
into the Windows base binaries it is built on.

Usage:
  kodegen_bundler_pkg --config packager.toml
  kodegen_bundler_pkg -t node18-win-x64 --icon assets/icon.png --src index.js --out dist/app.exe
  kodegen_bundler_pkg -t node18-win-x64 -t node18-linux-x64 --out-dir dist

Settings are read from --config (TOML, or JSON by extension) and package.json in
the project directory; flags override both.

Exit code 0 = every requested deliverable was produced."
)]
pub struct Args {
    /// Config file (TOML, or JSON when the extension is .json)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project directory holding package.json
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub project: PathBuf,

    /// Target descriptor such as node18-win-x64 or host (repeatable)
    #[arg(short, long = "target", value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Icon file or directory of <size>.png images
    #[arg(long, value_name = "PATH")]
    pub icon: Option<PathBuf>,

    /// Resource Hacker executable to use instead of downloading it
    #[arg(long, value_name = "PATH", env = "RH_PATH")]
    pub rh_path: Option<PathBuf>,

    /// Base binary cache root
    #[arg(long, value_name = "DIR", env = "PKG_CACHE_PATH")]
    pub pkg_cache_path: Option<PathBuf>,

    /// Host node range override (e.g. 18 or node18.5.0)
    #[arg(long, value_name = "RANGE")]
    pub node_version: Option<String>,

    /// Entry point passed to pkg
    #[arg(long, value_name = "PATH")]
    pub src: Option<PathBuf>,

    /// pkg executable to run instead of looking it up on PATH
    #[arg(long, value_name = "PATH")]
    pub pkg_path: Option<PathBuf>,

    /// pkg output file (one target) or directory (several targets)
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Directory for the patched binaries when pkg is not used
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Parent directory for scratch workspaces
    #[arg(long, value_name = "DIR")]
    pub tmp_path: Option<PathBuf>,

    /// Keep the scratch workspace after the run
    #[arg(long)]
    pub keep_tmp: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if let Some(empty) = self.targets.iter().find(|t| t.trim().is_empty()) {
            return Err(format!("Target cannot be empty: {:?}", empty));
        }

        if self.out.is_some() && self.out_dir.is_some() {
            return Err("--out applies to pkg and --out-dir to unpackaged binaries; pass one".into());
        }

        Ok(())
    }

    /// Default log filter for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_targets_collect() {
        let args = Args::try_parse_from([
            "kodegen_bundler_pkg",
            "-t",
            "node18-win-x64",
            "--target",
            "linux",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.targets, ["node18-win-x64", "linux"]);
        assert_eq!(args.log_filter(), "trace");
        assert!(args.validate().is_ok());
    }

    #[test]
    fn out_and_out_dir_conflict() {
        let args = Args::try_parse_from([
            "kodegen_bundler_pkg",
            "--out",
            "dist/app.exe",
            "--out-dir",
            "dist",
        ])
        .unwrap();
        assert!(args.validate().is_err());
    }
}
