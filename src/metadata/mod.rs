//! Project metadata from package.json

use crate::bundler::MetaData;
use crate::error::{BundlerError, CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name of the Node.js project manifest.
pub const PACKAGE_JSON: &str = "package.json";

/// Package metadata extracted from package.json
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageMetadata {
    /// Package name
    pub name: Option<String>,

    /// Package version (e.g., "1.0.0")
    pub version: Option<String>,

    /// Package description
    pub description: Option<String>,

    /// Entry point resolved against the project directory (`bin`, else `main`)
    pub entry: Option<PathBuf>,
}

#[derive(Deserialize)]
struct RawPackageJson {
    name: Option<String>,
    version: Option<String>,
    description: Option<String>,
    main: Option<String>,
    bin: Option<serde_json::Value>,
}

impl PackageMetadata {
    /// Metadata fields for resource generation.
    pub fn to_metadata(&self) -> MetaData {
        MetaData {
            name: self.name.clone(),
            version: self.version.clone(),
            description: self.description.clone(),
            legal: None,
        }
    }
}

/// Load package.json from `project_dir`.
///
/// Returns `Ok(None)` when the project has no package.json.
pub fn load_package_json(project_dir: &Path) -> Result<Option<PackageMetadata>> {
    let path = project_dir.join(PACKAGE_JSON);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(BundlerError::Cli(CliError::Config {
                path,
                reason: e.to_string(),
            }));
        }
    };
    parse_package_json(&content, project_dir).map(Some)
}

fn parse_package_json(content: &str, project_dir: &Path) -> Result<PackageMetadata> {
    let raw: RawPackageJson = serde_json::from_str(content)?;

    // `bin` is either a path or a map of command name to path.
    let bin = match &raw.bin {
        Some(serde_json::Value::String(path)) => Some(path.clone()),
        Some(serde_json::Value::Object(map)) => map
            .values()
            .find_map(|v| v.as_str().map(String::from)),
        _ => None,
    };

    Ok(PackageMetadata {
        name: raw.name,
        version: raw.version,
        description: raw.description,
        entry: bin.or(raw.main).map(|entry| project_dir.join(entry)),
    })
}
