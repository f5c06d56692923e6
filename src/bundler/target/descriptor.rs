//! Runtime descriptor tokens: node range, platform, and architecture.
//!
//! Token spellings follow the pkg-fetch naming scheme, with common aliases
//! (`darwin`, `windows`, `x86_64`, `aarch64`, ...) canonicalized on parse.

use semver::Version;
use std::fmt;

/// Operating system of a base binary.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Platform {
    /// Alpine Linux (musl)
    Alpine,
    /// FreeBSD
    FreeBsd,
    /// Linux (glibc)
    Linux,
    /// Fully static Linux
    LinuxStatic,
    /// macOS
    MacOs,
    /// Windows
    Win,
}

impl Platform {
    /// Parse a platform token, accepting aliases.
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "alpine" => Some(Self::Alpine),
            "freebsd" => Some(Self::FreeBsd),
            "linux" => Some(Self::Linux),
            "linuxstatic" => Some(Self::LinuxStatic),
            "macos" | "darwin" | "osx" => Some(Self::MacOs),
            "win" | "windows" | "win32" => Some(Self::Win),
            _ => None,
        }
    }

    /// Canonical pkg-fetch spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alpine => "alpine",
            Self::FreeBsd => "freebsd",
            Self::Linux => "linux",
            Self::LinuxStatic => "linuxstatic",
            Self::MacOs => "macos",
            Self::Win => "win",
        }
    }

    /// Platform of the running process.
    pub fn host() -> Self {
        match std::env::consts::OS {
            "windows" => Self::Win,
            "macos" => Self::MacOs,
            "freebsd" => Self::FreeBsd,
            _ => Self::Linux,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architecture of a base binary.
///
/// # Examples
///
/// ```
/// use kodegen_bundler_pkg::bundler::Arch;
///
/// assert_eq!(Arch::parse("x86_64"), Some(Arch::X64));
/// assert_eq!(Arch::parse("aarch64"), Some(Arch::Arm64));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Arch {
    /// x86_64 / AMD64
    X64,
    /// 32-bit x86
    X86,
    /// ARMv6
    Armv6,
    /// ARMv7 (hard-float)
    Armv7,
    /// AArch64 / ARM64
    Arm64,
    /// 64-bit PowerPC
    Ppc64,
    /// IBM Z
    S390x,
}

impl Arch {
    /// Parse an architecture token, accepting aliases.
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "x64" | "x86_64" | "amd64" => Some(Self::X64),
            "x86" | "ia32" | "i386" | "i686" => Some(Self::X86),
            "armv6" => Some(Self::Armv6),
            "armv7" | "arm" => Some(Self::Armv7),
            "arm64" | "aarch64" => Some(Self::Arm64),
            "ppc64" => Some(Self::Ppc64),
            "s390x" => Some(Self::S390x),
            _ => None,
        }
    }

    /// Canonical pkg-fetch spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::X86 => "x86",
            Self::Armv6 => "armv6",
            Self::Armv7 => "armv7",
            Self::Arm64 => "arm64",
            Self::Ppc64 => "ppc64",
            Self::S390x => "s390x",
        }
    }

    /// Architecture of the running process.
    pub fn host() -> Self {
        match std::env::consts::ARCH {
            "x86" => Self::X86,
            "arm" => Self::Armv7,
            "aarch64" => Self::Arm64,
            "powerpc64" => Self::Ppc64,
            "s390x" => Self::S390x,
            _ => Self::X64,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node version range, e.g. `node18`, `node18.5.0`, or `latest`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeRange(String);

impl NodeRange {
    /// Parse a node range token.
    ///
    /// Accepts `latest` and `node` followed by one to three dot-separated
    /// numeric components. A bare version such as `18.5.0` or `v18.5.0`
    /// (as printed by `node --version`) is normalized to `node18.5.0`.
    pub fn parse(token: &str) -> Option<Self> {
        let lower = token.to_ascii_lowercase();
        if lower == "latest" {
            return Some(Self(lower));
        }

        let digits = lower.strip_prefix("node")?;
        Self::from_version_digits(digits)
    }

    /// Build a range from a version string as printed by `node --version`.
    pub fn from_version(version: &str) -> Option<Self> {
        let trimmed = version.trim();
        let digits = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let digits = digits.strip_prefix("node").unwrap_or(digits);
        Self::from_version_digits(digits)
    }

    fn from_version_digits(digits: &str) -> Option<Self> {
        let parts: Vec<&str> = digits.split('.').collect();
        if parts.is_empty()
            || parts.len() > 3
            || parts
                .iter()
                .any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
        {
            return None;
        }
        Some(Self(format!("node{}", digits)))
    }

    /// Range as written in pkg target strings.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the `latest` range.
    pub fn is_latest(&self) -> bool {
        self.0 == "latest"
    }

    /// Exact version when all three components are given.
    pub fn exact_version(&self) -> Option<Version> {
        let digits = self.0.strip_prefix("node")?;
        if digits.split('.').count() != 3 {
            return None;
        }
        Version::parse(digits).ok()
    }

    /// Whether a concrete version satisfies this range.
    ///
    /// Each given component must match; missing components are wildcards.
    pub fn matches(&self, version: &Version) -> bool {
        if self.is_latest() {
            return true;
        }
        let Some(digits) = self.0.strip_prefix("node") else {
            return false;
        };
        let actual = [version.major, version.minor, version.patch];
        digits
            .split('.')
            .zip(actual)
            .all(|(want, have)| want.parse::<u64>().is_ok_and(|w| w == have))
    }
}

impl fmt::Display for NodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cache key for a base binary: (node range, platform, arch).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct RuntimeDescriptor {
    /// Node version range
    pub node_range: NodeRange,
    /// Target platform
    pub platform: Platform,
    /// Target architecture
    pub arch: Arch,
}

impl fmt::Display for RuntimeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.node_range, self.platform, self.arch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_aliases_canonicalize() {
        assert_eq!(Platform::parse("darwin"), Some(Platform::MacOs));
        assert_eq!(Platform::parse("macos"), Some(Platform::MacOs));
        assert_eq!(Platform::parse("Windows"), Some(Platform::Win));
        assert_eq!(Platform::parse("win"), Some(Platform::Win));
        assert_eq!(Platform::parse("solaris"), None);
    }

    #[test]
    fn node_range_accepts_partial_versions() {
        assert_eq!(NodeRange::parse("node12").unwrap().as_str(), "node12");
        assert_eq!(
            NodeRange::parse("node12.13.1").unwrap().as_str(),
            "node12.13.1"
        );
        assert!(NodeRange::parse("latest").unwrap().is_latest());
        assert_eq!(NodeRange::parse("node"), None);
        assert_eq!(NodeRange::parse("nodex"), None);
        assert_eq!(NodeRange::parse("12"), None);
    }

    #[test]
    fn node_range_from_node_version_output() {
        let range = NodeRange::from_version("v18.17.1\n").unwrap();
        assert_eq!(range.as_str(), "node18.17.1");
        assert_eq!(range.exact_version(), Some(Version::new(18, 17, 1)));
    }

    #[test]
    fn node_range_matching() {
        let major = NodeRange::parse("node18").unwrap();
        assert!(major.matches(&Version::new(18, 5, 0)));
        assert!(!major.matches(&Version::new(16, 5, 0)));
        assert_eq!(major.exact_version(), None);

        let minor = NodeRange::parse("node18.5").unwrap();
        assert!(minor.matches(&Version::new(18, 5, 3)));
        assert!(!minor.matches(&Version::new(18, 6, 0)));
    }
}
