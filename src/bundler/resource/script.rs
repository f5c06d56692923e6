//! Resource script generation.
//!
//! Renders the VERSIONINFO script from a typed record using handlebars,
//! then writes it into the scratch workspace for compilation.

use super::{
    fields::{FILE_VERSION, PRODUCT_VERSION, ResourceFields},
    template::{LANG_CODEPAGE, RC_TEMPLATE},
    version::to_comma_version,
};
use crate::bundler::error::{ErrorExt, Result};
use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

/// Version rendered when a version field is absent.
const ZERO_VERSION: &str = "0,0,0,0";

/// Typed resource script record.
///
/// Version slots hold the comma four-component form; entries are rendered
/// in field order as `VALUE "key", "value"` lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceScript {
    /// FILEVERSION slot
    pub file_version: String,
    /// PRODUCTVERSION slot
    pub product_version: String,
    /// StringFileInfo language/codepage block id
    pub lang_codepage: String,
    /// String table entries
    pub entries: Vec<(String, String)>,
}

#[derive(Serialize)]
struct TemplateData<'a> {
    file_version: &'a str,
    product_version: &'a str,
    lang_codepage: &'a str,
    file_info_block: String,
}

impl ResourceScript {
    /// Builds the script record from resource fields.
    pub fn from_fields(fields: &ResourceFields) -> Self {
        let comma = |key: &str| {
            fields
                .get(key)
                .map(to_comma_version)
                .unwrap_or_else(|| ZERO_VERSION.to_string())
        };

        Self {
            file_version: comma(FILE_VERSION),
            product_version: comma(PRODUCT_VERSION),
            lang_codepage: LANG_CODEPAGE.to_string(),
            entries: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Renders the script text.
    pub fn render(&self) -> Result<String> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);

        let file_info_block: String = self
            .entries
            .iter()
            .map(|(key, value)| {
                format!("\t\t\tVALUE \"{}\", \"{}\"\n", rc_escape(key), rc_escape(value))
            })
            .collect();

        let data = TemplateData {
            file_version: &self.file_version,
            product_version: &self.product_version,
            lang_codepage: &self.lang_codepage,
            file_info_block,
        };

        Ok(handlebars.render_template(RC_TEMPLATE, &data)?)
    }

    /// Renders and writes the script to `path`.
    pub async fn write(&self, path: &Path) -> Result<()> {
        let content = self.render()?;
        log::debug!("Writing resource script to {}", path.display());
        tokio::fs::write(path, content)
            .await
            .fs_context("writing resource script", path)
    }
}

/// Escapes a value for an RC string literal.
///
/// Quotes are doubled, backslashes and newlines become escape sequences.
pub fn rc_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\"\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}
