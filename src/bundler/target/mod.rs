//! Target resolution.
//!
//! Turns caller-supplied target descriptors (`host`, `node18-win-x64`,
//! `win-node16`, ...) into concrete [`Target`] records. Resolution is pure:
//! no files are touched and nothing is fetched.

mod descriptor;
mod host;

pub use descriptor::{Arch, NodeRange, Platform, RuntimeDescriptor};
pub use host::{DEFAULT_NODE_RANGE, HostInfo};

use crate::bundler::error::{Error, Result};
use semver::Version;
use std::path::PathBuf;

/// Descriptor that resolves to the host runtime.
pub const HOST_TARGET: &str = "host";

/// One requested build output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    /// Label as given by the caller.
    pub name: String,

    /// Resolved runtime descriptor (cache key for the base binary).
    pub descriptor: RuntimeDescriptor,

    /// Shared cached base binary. Filled in by the dependency fetch stage
    /// and only ever read.
    pub base_binary: Option<PathBuf>,

    /// Exact node version the range resolved to during the fetch stage.
    pub node_version: Option<Version>,

    /// Copy of the base binary in the scratch workspace's pkg cache. This
    /// is the file that gets patched and packaged.
    pub working_copy: Option<PathBuf>,
}

impl Target {
    /// Create an unfetched target.
    pub fn new(name: impl Into<String>, descriptor: RuntimeDescriptor) -> Self {
        Self {
            name: name.into(),
            descriptor,
            base_binary: None,
            node_version: None,
            working_copy: None,
        }
    }

    /// Whether the target's base binary is a Windows PE (and thus patchable).
    pub fn is_windows(&self) -> bool {
        self.descriptor.platform == Platform::Win
    }

    /// Descriptor string as passed to `pkg --target`.
    ///
    /// Once the fetch stage has pinned an exact version it is used instead
    /// of the range, so `pkg` packages the binary that was patched.
    pub fn pkg_target(&self) -> String {
        match &self.node_version {
            Some(version) => format!(
                "node{}-{}-{}",
                version, self.descriptor.platform, self.descriptor.arch
            ),
            None => self.descriptor.to_string(),
        }
    }

    /// File name for this target's deliverable.
    pub fn output_file_name(&self, base: &str) -> String {
        if self.is_windows() {
            format!("{}-{}.exe", base, self.name)
        } else {
            format!("{}-{}", base, self.name)
        }
    }
}

/// Resolve target descriptors against the host runtime.
///
/// Order is preserved and duplicates are kept. An unrecognized token fails
/// the whole call with [`Error::InvalidTarget`].
///
/// # Examples
///
/// ```
/// use kodegen_bundler_pkg::bundler::{resolve_targets, Arch, HostInfo, NodeRange, Platform};
///
/// let host = HostInfo {
///     node_range: NodeRange::parse("node18").unwrap(),
///     platform: Platform::Linux,
///     arch: Arch::X64,
/// };
/// let targets = resolve_targets(&["win".to_string()], &host).unwrap();
/// assert_eq!(targets[0].pkg_target(), "node18-win-x64");
/// ```
pub fn resolve_targets(names: &[String], host: &HostInfo) -> Result<Vec<Target>> {
    if names.is_empty() {
        return Ok(vec![resolve_one(HOST_TARGET, host)?]);
    }

    names.iter().map(|name| resolve_one(name, host)).collect()
}

fn resolve_one(name: &str, host: &HostInfo) -> Result<Target> {
    let mut descriptor = RuntimeDescriptor {
        node_range: host.node_range.clone(),
        platform: host.platform,
        arch: host.arch,
    };

    if name == HOST_TARGET {
        return Ok(Target::new(name, descriptor));
    }

    for token in name.split('-') {
        if let Some(range) = NodeRange::parse(token) {
            descriptor.node_range = range;
        } else if let Some(platform) = Platform::parse(token) {
            descriptor.platform = platform;
        } else if let Some(arch) = Arch::parse(token) {
            descriptor.arch = arch;
        } else {
            return Err(Error::InvalidTarget {
                target: name.to_string(),
                token: token.to_string(),
            });
        }
    }

    log::debug!("Resolved target {} -> {}", name, descriptor);
    Ok(Target::new(name, descriptor))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> HostInfo {
        HostInfo {
            node_range: NodeRange::parse("node16.20.2").unwrap(),
            platform: Platform::Linux,
            arch: Arch::Arm64,
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_list_defaults_to_host() {
        let targets = resolve_targets(&[], &host()).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name, "host");
        assert_eq!(targets[0].pkg_target(), "node16.20.2-linux-arm64");
    }

    #[test]
    fn tokens_in_any_order() {
        for name in [
            "node12-win-x64",
            "win-node12-x64",
            "x64-win-node12",
            "x64-node12-win",
        ] {
            let targets = resolve_targets(&names(&[name]), &host()).unwrap();
            let d = &targets[0].descriptor;
            assert_eq!(d.node_range.as_str(), "node12", "{name}");
            assert_eq!(d.platform, Platform::Win, "{name}");
            assert_eq!(d.arch, Arch::X64, "{name}");
            assert_eq!(targets[0].name, name);
        }
    }

    #[test]
    fn omitted_axes_default_to_host() {
        let targets = resolve_targets(&names(&["win"]), &host()).unwrap();
        let d = &targets[0].descriptor;
        assert_eq!(d.node_range.as_str(), "node16.20.2");
        assert_eq!(d.platform, Platform::Win);
        assert_eq!(d.arch, Arch::Arm64);

        let targets = resolve_targets(&names(&["node14"]), &host()).unwrap();
        assert_eq!(targets[0].pkg_target(), "node14-linux-arm64");
    }

    #[test]
    fn aliases_are_canonicalized() {
        let targets = resolve_targets(&names(&["node18-darwin-x86_64"]), &host()).unwrap();
        assert_eq!(targets[0].pkg_target(), "node18-macos-x64");
    }

    #[test]
    fn order_and_duplicates_preserved() {
        let list = names(&["node18-win-x64", "host", "node18-win-x64"]);
        let targets = resolve_targets(&list, &host()).unwrap();
        let got: Vec<_> = targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(got, vec!["node18-win-x64", "host", "node18-win-x64"]);
    }

    #[test]
    fn unknown_token_fails_whole_call() {
        let list = names(&["node18-win-x64", "node18-win-sparc"]);
        let err = resolve_targets(&list, &host()).unwrap_err();
        match err {
            Error::InvalidTarget { target, token } => {
                assert_eq!(target, "node18-win-sparc");
                assert_eq!(token, "sparc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn windows_detection_and_output_name() {
        let targets = resolve_targets(&names(&["node18-win-x64", "linux"]), &host()).unwrap();
        assert!(targets[0].is_windows());
        assert!(!targets[1].is_windows());
        assert_eq!(targets[0].output_file_name("app"), "app-node18-win-x64.exe");
        assert_eq!(targets[1].output_file_name("app"), "app-linux");
    }

    #[test]
    fn pinned_version_replaces_range_for_pkg() {
        let mut targets = resolve_targets(&names(&["node18-win-x64"]), &host()).unwrap();
        assert_eq!(targets[0].pkg_target(), "node18-win-x64");

        targets[0].node_version = Some(Version::new(18, 15, 0));
        assert_eq!(targets[0].pkg_target(), "node18.15.0-win-x64");
        assert_eq!(targets[0].name, "node18-win-x64");
    }
}
