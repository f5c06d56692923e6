//! Version string normalization for VERSIONINFO.

use regex::Regex;
use std::sync::LazyLock;

static FOUR_PART_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\d+\.\d+\.\d+$").unwrap_or_else(|e| panic!("invalid version regex: {e}"))
});

/// Convert a version string into the comma form VERSIONINFO expects.
///
/// Heuristic, not a semver parser:
/// - `1.2.3.4` → `1,2,3,4`
/// - `1.2.3` → `1,2,3,0`
/// - `1.2.3-beta.1` → `1,2,3,0` (pre-release suffix dropped)
///
/// Malformed input yields a best-effort result rather than an error.
pub fn to_comma_version(version: &str) -> String {
    if FOUR_PART_VERSION.is_match(version) {
        return version.replace('.', ",");
    }

    let release = version.split('-').next().unwrap_or(version);
    format!("{},0", release.split('.').collect::<Vec<_>>().join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_part_versions_keep_all_components() {
        assert_eq!(to_comma_version("1.2.3.4"), "1,2,3,4");
        assert_eq!(to_comma_version("10.20.30.40"), "10,20,30,40");
    }

    #[test]
    fn three_part_versions_get_zero_build() {
        assert_eq!(to_comma_version("1.2.3"), "1,2,3,0");
    }

    #[test]
    fn prerelease_suffix_is_stripped() {
        assert_eq!(to_comma_version("1.2.3-beta.1"), "1,2,3,0");
        assert_eq!(to_comma_version("0.1.0-rc.2+build.5"), "0,1,0,0");
    }

    #[test]
    fn malformed_input_is_best_effort() {
        assert_eq!(to_comma_version("7"), "7,0");
        assert_eq!(to_comma_version("1.2.3.4-beta"), "1,2,3,4,0");
    }
}
