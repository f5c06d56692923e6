//! Version resource string fields.

use crate::bundler::settings::MetaData;
use std::collections::BTreeMap;

/// Standard StringFileInfo keys derived from program metadata.
pub const FILE_DESCRIPTION: &str = "FileDescription";
pub const FILE_VERSION: &str = "FileVersion";
pub const INTERNAL_NAME: &str = "InternalName";
pub const LEGAL_COPYRIGHT: &str = "LegalCopyright";
pub const ORIGINAL_FILENAME: &str = "OriginalFilename";
pub const PRODUCT_NAME: &str = "ProductName";
pub const PRODUCT_VERSION: &str = "ProductVersion";

/// Ordered key/value fields of the version resource string table.
///
/// Built from [`MetaData`] defaults, then raw overrides replace or extend
/// individual keys. Absent values never produce an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceFields(BTreeMap<String, String>);

impl ResourceFields {
    /// Derives the default fields from metadata and applies `overrides` on top.
    ///
    /// ```
    /// use kodegen_bundler_pkg::bundler::{MetaData, resource::ResourceFields};
    /// use std::collections::BTreeMap;
    ///
    /// let meta = MetaData {
    ///     name: Some("tool".into()),
    ///     version: Some("1.2.3".into()),
    ///     ..Default::default()
    /// };
    /// let fields = ResourceFields::derive(&meta, &BTreeMap::new());
    /// assert_eq!(fields.get("OriginalFilename"), Some("tool.exe"));
    /// assert_eq!(fields.get("FileDescription"), None);
    /// ```
    pub fn derive(metadata: &MetaData, overrides: &BTreeMap<String, String>) -> Self {
        let mut fields = BTreeMap::new();
        let mut put = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                fields.insert(key.to_string(), value);
            }
        };

        let exe_name = metadata.name.as_ref().map(|name| format!("{name}.exe"));
        put(FILE_DESCRIPTION, metadata.description.clone());
        put(FILE_VERSION, metadata.version.clone());
        put(INTERNAL_NAME, exe_name.clone());
        put(LEGAL_COPYRIGHT, metadata.legal.clone());
        put(ORIGINAL_FILENAME, exe_name);
        put(PRODUCT_NAME, metadata.name.clone());
        put(PRODUCT_VERSION, metadata.version.clone());

        for (key, value) in overrides {
            fields.insert(key.clone(), value.clone());
        }
        Self(fields)
    }

    /// Looks up a field value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterates fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> MetaData {
        MetaData {
            name: Some("demo".into()),
            version: Some("1.4.0".into()),
            description: None,
            legal: Some("Copyright Example".into()),
        }
    }

    #[test]
    fn derives_names_and_versions() {
        let fields = ResourceFields::derive(&meta(), &BTreeMap::new());
        assert_eq!(fields.get(INTERNAL_NAME), Some("demo.exe"));
        assert_eq!(fields.get(ORIGINAL_FILENAME), Some("demo.exe"));
        assert_eq!(fields.get(PRODUCT_NAME), Some("demo"));
        assert_eq!(fields.get(FILE_VERSION), Some("1.4.0"));
        assert_eq!(fields.get(PRODUCT_VERSION), Some("1.4.0"));
        assert_eq!(fields.get(LEGAL_COPYRIGHT), Some("Copyright Example"));
    }

    #[test]
    fn absent_description_has_no_entry() {
        let fields = ResourceFields::derive(&meta(), &BTreeMap::new());
        assert_eq!(fields.get(FILE_DESCRIPTION), None);
        assert_eq!(fields.len(), 6);
    }

    #[test]
    fn overrides_win_and_extend() {
        let overrides = BTreeMap::from([
            (FILE_VERSION.to_string(), "9.9.9.9".to_string()),
            ("CompanyName".to_string(), "Example Corp".to_string()),
        ]);
        let fields = ResourceFields::derive(&meta(), &overrides);
        assert_eq!(fields.get(FILE_VERSION), Some("9.9.9.9"));
        assert_eq!(fields.get(PRODUCT_VERSION), Some("1.4.0"));
        assert_eq!(fields.get("CompanyName"), Some("Example Corp"));
    }

    #[test]
    fn empty_metadata_yields_no_fields() {
        let fields = ResourceFields::derive(&MetaData::default(), &BTreeMap::new());
        assert!(fields.is_empty());
    }
}
