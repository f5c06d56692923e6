//! Packaging tool invocation settings.

use serde::Deserialize;
use std::path::PathBuf;

/// How to invoke `pkg`.
///
/// Either a raw argument vector (`args`, passed verbatim) or a source entry
/// point plus output location from which the default arguments are derived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PkgSettings {
    /// Source entry point (script, package.json, or project directory).
    pub src: Option<PathBuf>,

    /// Output file (single target) or directory (several targets).
    pub out: Option<PathBuf>,

    /// Raw argument vector. Takes precedence over `src`/`out`.
    pub args: Option<Vec<String>>,

    /// Packaging tool to launch. Looked up on `PATH` (then `npx pkg`) when
    /// absent.
    pub program: Option<PathBuf>,
}
