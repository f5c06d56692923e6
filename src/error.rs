//! Error types for the command-line front end.
//!
//! Pipeline failures arrive as [`crate::bundler::Error`] and are wrapped
//! here together with configuration and argument problems.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for CLI operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors (package.json, JSON config)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Packaging pipeline errors
    #[error("Packaging error: {0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Configuration file could not be read
    #[error("Cannot read config {}: {reason}", path.display())]
    Config {
        /// Config file path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::Error as E;
        match self {
            BundlerError::Bundler(E::InvalidTarget { .. }) => vec![
                "Targets look like node18-win-x64; tokens may appear in any order".to_string(),
            ],
            BundlerError::Bundler(E::Fetch { .. }) => vec![
                "Check network access, or pass --rh-path / pre-populate the pkg cache".to_string(),
            ],
            BundlerError::Bundler(E::ResourceTool { .. }) => vec![
                "On non-Windows hosts install wine so Resource Hacker can run".to_string(),
            ],
            BundlerError::Bundler(E::Build(_)) => {
                vec!["Install pkg (npm install -g pkg) or drop the pkg section".to_string()]
            }
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
