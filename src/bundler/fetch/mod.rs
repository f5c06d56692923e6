//! Base binary acquisition.
//!
//! The packager never reaches for a global cache directly. It is handed a
//! [`BinaryFetcher`], which maps a [`RuntimeDescriptor`] to a path on disk.
//!
//! - [`PkgFetch`] - on-disk pkg-fetch cache, downloading on miss
//! - [`LocalBinaries`] - fixed descriptor → path table (offline use, tests)

mod local;
mod pkg_fetch;

pub use local::LocalBinaries;
pub use pkg_fetch::{PKG_FETCH_TAG, PkgFetch, cached_binary_path};

use crate::bundler::{Result, target::RuntimeDescriptor};
use semver::Version;
use std::{future::Future, path::PathBuf};

/// A base binary on disk and the exact node version it was built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchedBinary {
    /// Shared cache path. Never written by the packager.
    pub path: PathBuf,
    /// Exact node version the descriptor's range resolved to.
    pub version: Version,
}

/// Provides base runtime binaries keyed by descriptor.
///
/// Implementations must be idempotent: asking twice for the same descriptor
/// returns the same cached path without refetching.
pub trait BinaryFetcher: Send + Sync {
    /// Return the base binary for `descriptor`, fetching it if it is not
    /// cached yet.
    fn need(&self, descriptor: &RuntimeDescriptor)
    -> impl Future<Output = Result<FetchedBinary>> + Send;
}
