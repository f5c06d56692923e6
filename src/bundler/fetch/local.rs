//! Fixed table of pre-provisioned base binaries.

use super::{BinaryFetcher, FetchedBinary};
use crate::bundler::{
    error::{Error, Result},
    target::RuntimeDescriptor,
};
use std::{collections::HashMap, path::PathBuf};

/// Serves base binaries from a fixed descriptor → path table.
///
/// Useful for offline builds where binaries were provisioned ahead of time.
/// Descriptors must name an exact node version (`node18.5.0`). Unknown or
/// ranged descriptors fail with [`Error::Fetch`]; listed paths that do not
/// exist fail with [`Error::MissingBinary`].
#[derive(Clone, Debug, Default)]
pub struct LocalBinaries {
    binaries: HashMap<RuntimeDescriptor, PathBuf>,
}

impl LocalBinaries {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a binary for a descriptor.
    pub fn with_binary(mut self, descriptor: RuntimeDescriptor, path: impl Into<PathBuf>) -> Self {
        self.binaries.insert(descriptor, path.into());
        self
    }
}

impl BinaryFetcher for LocalBinaries {
    async fn need(&self, descriptor: &RuntimeDescriptor) -> Result<FetchedBinary> {
        let version = descriptor.node_range.exact_version().ok_or_else(|| Error::Fetch {
            what: format!("base binary {}", descriptor),
            reason: "local binaries are registered by exact node version".to_string(),
        })?;
        let path = self
            .binaries
            .get(descriptor)
            .ok_or_else(|| Error::Fetch {
                what: format!("base binary {}", descriptor),
                reason: "no local binary registered for this descriptor".to_string(),
            })?;

        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(Error::MissingBinary(path.clone()));
        }
        Ok(FetchedBinary {
            path: path.clone(),
            version,
        })
    }
}
