//! Program metadata used to derive version resource fields.

use serde::Deserialize;

/// Program metadata.
///
/// Every field is optional; absent fields produce no resource entry.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_pkg::bundler::MetaData;
///
/// let meta = MetaData {
///     name: Some("myapp".into()),
///     version: Some("1.4.0".into()),
///     description: Some("My application".into()),
///     legal: Some("Copyright (c) Example Corp".into()),
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MetaData {
    /// Program name. Drives ProductName, InternalName and OriginalFilename
    /// (`<name>.exe`).
    pub name: Option<String>,

    /// Program version. Drives FileVersion and ProductVersion.
    ///
    /// Example: "1.0.0", "0.2.3-beta.1"
    pub version: Option<String>,

    /// Drives FileDescription.
    pub description: Option<String>,

    /// Drives LegalCopyright.
    pub legal: Option<String>,
}

impl MetaData {
    /// Fill fields that are still `None` from `other`.
    pub fn fill_missing(&mut self, other: &MetaData) {
        if self.name.is_none() {
            self.name.clone_from(&other.name);
        }
        if self.version.is_none() {
            self.version.clone_from(&other.version);
        }
        if self.description.is_none() {
            self.description.clone_from(&other.description);
        }
        if self.legal.is_none() {
            self.legal.clone_from(&other.legal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_missing_keeps_explicit_values() {
        let mut meta = MetaData {
            name: Some("explicit".into()),
            ..Default::default()
        };
        meta.fill_missing(&MetaData {
            name: Some("fallback".into()),
            version: Some("2.0.0".into()),
            ..Default::default()
        });
        assert_eq!(meta.name.as_deref(), Some("explicit"));
        assert_eq!(meta.version.as_deref(), Some("2.0.0"));
        assert_eq!(meta.description, None);
    }
}
