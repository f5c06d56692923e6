//! Host runtime detection.

use super::{Arch, NodeRange, Platform};
use crate::bundler::error::{Error, Result};

/// Node range used when neither configuration nor `PATH` provides one.
pub const DEFAULT_NODE_RANGE: &str = "node18";

/// Runtime values that `host` targets and omitted tokens resolve to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HostInfo {
    /// Host node range
    pub node_range: NodeRange,
    /// Host platform
    pub platform: Platform,
    /// Host architecture
    pub arch: Arch,
}

impl HostInfo {
    /// Host values with an explicit node range.
    pub fn with_node_range(node_range: NodeRange) -> Self {
        Self {
            node_range,
            platform: Platform::host(),
            arch: Arch::host(),
        }
    }

    /// Detect the host runtime.
    ///
    /// The node range comes from `node_version` when given, otherwise from
    /// `node --version` on `PATH`, otherwise [`DEFAULT_NODE_RANGE`].
    pub async fn detect(node_version: Option<&str>) -> Result<Self> {
        if let Some(version) = node_version {
            let range = NodeRange::parse(version)
                .or_else(|| NodeRange::from_version(version))
                .ok_or_else(|| Error::InvalidTarget {
                    target: "host".to_string(),
                    token: version.to_string(),
                })?;
            return Ok(Self::with_node_range(range));
        }

        let range = match detect_node_version().await {
            Some(range) => range,
            None => {
                log::debug!(
                    "node not found on PATH, using default range {}",
                    DEFAULT_NODE_RANGE
                );
                NodeRange::parse(DEFAULT_NODE_RANGE)
                    .ok_or_else(|| Error::GenericError("invalid default node range".into()))?
            }
        };

        Ok(Self::with_node_range(range))
    }
}

/// Ask the `node` on `PATH` for its version.
async fn detect_node_version() -> Option<NodeRange> {
    let node = which::which("node").ok()?;
    let output = tokio::process::Command::new(&node)
        .arg("--version")
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        log::debug!("`{} --version` exited with {}", node.display(), output.status);
        return None;
    }

    let version = String::from_utf8_lossy(&output.stdout);
    let range = NodeRange::from_version(&version);
    if let Some(range) = &range {
        log::debug!("Detected host node range {}", range);
    }
    range
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn explicit_node_version_wins() {
        let host = HostInfo::detect(Some("v16.20.2")).await.unwrap();
        assert_eq!(host.node_range.as_str(), "node16.20.2");
        assert_eq!(host.platform, Platform::host());
        assert_eq!(host.arch, Arch::host());
    }

    #[tokio::test]
    async fn explicit_range_token_is_accepted() {
        let host = HostInfo::detect(Some("node14")).await.unwrap();
        assert_eq!(host.node_range.as_str(), "node14");
    }

    #[tokio::test]
    async fn garbage_node_version_is_rejected() {
        let err = HostInfo::detect(Some("fourteen")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidTarget { ref token, .. } if token == "fourteen"));
    }
}
