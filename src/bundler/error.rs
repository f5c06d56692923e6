//! Error types for the packaging pipeline.
//!
//! Every pipeline stage reports failures through [`Error`]. Cleanup failures
//! are collected separately as [`CleanupError`] so they never replace the
//! primary result of a run.

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// Result type alias for packaging operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the packaging pipeline.
#[derive(Debug, ThisError)]
pub enum Error {
    /// A target descriptor contains a token that is not a node range,
    /// platform, or architecture.
    #[error("invalid target `{target}`: unrecognized token `{token}`")]
    InvalidTarget {
        /// The descriptor as given by the caller
        target: String,
        /// The offending token
        token: String,
    },

    /// Download or extraction of the resource editor or a base binary failed.
    #[error("failed to fetch {what}: {reason}")]
    Fetch {
        /// What was being fetched
        what: String,
        /// Failure detail
        reason: String,
    },

    /// A cached binary expected by a mutation step does not exist.
    #[error("expected binary not found: {}", .0.display())]
    MissingBinary(PathBuf),

    /// The resource editor exited unsuccessfully.
    #[error("resource editor action `{action}` failed ({status}): {stderr}")]
    ResourceTool {
        /// Action passed to the resource editor
        action: String,
        /// Exit status description
        status: String,
        /// Captured diagnostic output
        stderr: String,
    },

    /// The icon source could not be read or converted.
    #[error("icon preparation failed for {}: {reason}", path.display())]
    IconPrep {
        /// Icon source path
        path: PathBuf,
        /// Failure detail
        reason: String,
    },

    /// The packaging tool failed.
    #[error("pkg failed: {0}")]
    Build(String),

    /// Filesystem error with context about the attempted operation.
    #[error("{context} ({}): {error}", path.display())]
    Fs {
        /// What was being attempted
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        error: io::Error,
    },

    /// IO error without further context.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// An external command could not be started.
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        /// Command name
        command: String,
        /// Spawn error
        error: io::Error,
    },

    /// Zip archive error.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Template rendering error.
    #[error("template error: {0}")]
    Template(#[from] handlebars::RenderError),

    /// Error wrapped with a context message.
    #[error("{context}: {source}")]
    Context {
        /// Context message
        context: String,
        /// Wrapped error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Any other error.
    #[error("{0}")]
    GenericError(String),
}

/// Failure removing the scratch workspace.
///
/// Collected during cleanup and reported as a warning.
#[derive(Debug, ThisError)]
#[error("cleanup of {} failed: {source}", path.display())]
pub struct CleanupError {
    /// Path that could not be removed
    pub path: PathBuf,
    /// Underlying error
    #[source]
    pub source: io::Error,
}

/// Attach filesystem context to IO results.
pub trait ErrorExt<T> {
    /// Wrap the error with the attempted operation and path.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Attach a context message to results and options.
pub trait Context<T> {
    /// Wrap the error (or `None`) with a message.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context {
            context: context.to_string(),
            source: Box::new(e),
        })
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

/// Return early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_context_keeps_path_and_message() {
        let err = std::fs::read("/definitely/not/here")
            .fs_context("reading fixture", "/definitely/not/here")
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("reading fixture (/definitely/not/here)"));
    }

    #[test]
    fn option_context_becomes_generic_error() {
        let value: Option<u8> = None;
        let err = value.context("value is required").unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m == "value is required"));
    }

    #[test]
    fn invalid_target_names_token() {
        let err = Error::InvalidTarget {
            target: "node12-win-sparc".into(),
            token: "sparc".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid target `node12-win-sparc`: unrecognized token `sparc`"
        );
    }
}
