//! Windows version resources.
//!
//! Generates the VERSIONINFO script, compiles it with Resource Hacker and
//! injects the compiled blob (plus an optional icon) into working copies of
//! base binaries.
//!
//! # Module Organization
//!
//! - `fields` - metadata to string table fields
//! - `version` - comma version normalization
//! - `template` - resource script template
//! - `script` - typed script record and rendering
//! - `hacker` - Resource Hacker toolset and command builder

mod fields;
mod hacker;
mod script;
mod template;
mod version;

pub use fields::ResourceFields;
pub use hacker::{
    RESOURCE_HACKER_URL, ResourceHacker, RhAction, RhCommand, cached_exe_path, get_resource_hacker,
};
pub use script::{ResourceScript, rc_escape};
pub use version::to_comma_version;

use crate::bundler::error::{Error, Result};
use std::path::Path;

/// Mask selecting the main application icon group.
pub const ICON_MASK: &str = "ICONGROUP,MAINICON,";

/// Compile a resource script into a `.res` blob.
pub async fn compile_script(tool: &ResourceHacker, rc_path: &Path, res_path: &Path) -> Result<()> {
    log::info!("Compiling resource script {}", rc_path.display());
    RhCommand::new(RhAction::Compile)
        .open(rc_path)
        .save(res_path)
        .run(tool)
        .await
}

/// Inject compiled resources, and optionally an icon, into `binary` in place.
///
/// `binary` must be a working copy owned by the run, never a shared cache
/// entry.
///
/// # Errors
///
/// [`Error::MissingBinary`] if `binary` does not exist, otherwise whatever
/// the editor reports.
pub async fn patch_binary(
    tool: &ResourceHacker,
    binary: &Path,
    res_path: &Path,
    icon: Option<&Path>,
) -> Result<()> {
    if !tokio::fs::try_exists(binary).await.unwrap_or(false) {
        return Err(Error::MissingBinary(binary.to_path_buf()));
    }

    log::info!("Editing resources of {}", binary.display());
    RhCommand::new(RhAction::AddOverwrite)
        .open(binary)
        .save(binary)
        .resource(res_path)
        .run(tool)
        .await?;

    if let Some(icon) = icon {
        log::info!("Replacing icon of {}", binary.display());
        RhCommand::new(RhAction::AddOverwrite)
            .open(binary)
            .save(binary)
            .resource(icon)
            .mask(ICON_MASK)
            .run(tool)
            .await?;
    }

    Ok(())
}
