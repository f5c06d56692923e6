//! Node.js executable packaging with Windows resource injection.
//!
//! The pipeline resolves targets, fetches Resource Hacker and pkg-fetch
//! base binaries, renders and compiles a VERSIONINFO script, injects it
//! (and an icon) into a private working copy of each Windows base binary,
//! and runs `pkg` against those copies. The shared cache is only read.
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_pkg::bundler::{MetaData, Packager, PkgSettings, SettingsBuilder};
//!
//! # async fn example() -> kodegen_bundler_pkg::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .targets(vec!["node18-win-x64".into()])
//!     .metadata(MetaData {
//!         name: Some("myapp".into()),
//!         version: Some("1.0.0".into()),
//!         description: Some("My application".into()),
//!         ..Default::default()
//!     })
//!     .icon("assets/icon.png")
//!     .pkg(PkgSettings {
//!         src: Some("index.js".into()),
//!         out: Some("dist/myapp.exe".into()),
//!         ..Default::default()
//!     })
//!     .build()?;
//!
//! let report = Packager::with_pkg_fetch(settings).run().await?;
//! println!("{} artifacts", report.artifacts.len());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod fetch;
pub mod icon;
pub mod pkg;
pub mod resource;
pub mod settings;
pub mod target;
pub mod utils;

pub use builder::{PackageReport, PackagedArtifact, Packager};
pub use error::{CleanupError, Error, Result};
pub use fetch::{BinaryFetcher, FetchedBinary, LocalBinaries, PkgFetch};
pub use settings::{MetaData, PkgSettings, Settings, SettingsBuilder};
pub use target::{Arch, HostInfo, NodeRange, Platform, RuntimeDescriptor, Target, resolve_targets};
