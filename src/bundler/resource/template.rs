//! Resource script template.

/// VERSIONINFO resource script rendered with handlebars (no HTML escaping).
///
/// Slots:
/// - `file_version` / `product_version` - comma four-component versions
/// - `lang_codepage` - StringFileInfo block id (language + codepage, hex)
/// - `file_info_block` - pre-rendered `VALUE "key", "value"` lines
pub const RC_TEMPLATE: &str = r#"1 VERSIONINFO
FILEVERSION {{file_version}}
PRODUCTVERSION {{product_version}}
FILEOS 0x40004
FILETYPE 0x1
{
	BLOCK "StringFileInfo"
	{
		BLOCK "{{lang_codepage}}"
		{
{{file_info_block}}		}
	}

	BLOCK "VarFileInfo"
	{
		VALUE "Translation", 0x0409, 0x04B0
	}
}
"#;

/// US English, Unicode.
pub const LANG_CODEPAGE: &str = "040904B0";
