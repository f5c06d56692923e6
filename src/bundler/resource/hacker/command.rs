//! Typed Resource Hacker command line.

use super::ResourceHacker;
use crate::bundler::error::{Error, Result};
use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
};

/// Resource Hacker `-action` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RhAction {
    /// Compile a `.rc` script into a `.res` blob.
    Compile,
    /// Add resources, replacing existing ones.
    AddOverwrite,
    /// Add resources, failing if they exist.
    Add,
    /// Delete resources matching the mask.
    Delete,
    /// Extract resources matching the mask.
    Extract,
    /// Modify existing resources only.
    Modify,
}

impl RhAction {
    /// Command-line spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            RhAction::Compile => "compile",
            RhAction::AddOverwrite => "addoverwrite",
            RhAction::Add => "add",
            RhAction::Delete => "delete",
            RhAction::Extract => "extract",
            RhAction::Modify => "modify",
        }
    }
}

impl fmt::Display for RhAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One Resource Hacker invocation.
///
/// Options are emitted in the fixed order `-open -action -save -resource
/// -mask`, each only when set.
///
/// ```
/// use kodegen_bundler_pkg::bundler::resource::{RhAction, RhCommand};
///
/// let cmd = RhCommand::new(RhAction::Compile)
///     .open("bin.rc")
///     .save("bin.res");
/// let args: Vec<String> = cmd
///     .args()
///     .into_iter()
///     .map(|a| a.to_string_lossy().into_owned())
///     .collect();
/// assert_eq!(args, ["-open", "bin.rc", "-action", "compile", "-save", "bin.res"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RhCommand {
    action: RhAction,
    open: Option<PathBuf>,
    save: Option<PathBuf>,
    resource: Option<PathBuf>,
    mask: Option<String>,
}

impl RhCommand {
    /// Starts a command for `action`.
    pub fn new(action: RhAction) -> Self {
        Self {
            action,
            open: None,
            save: None,
            resource: None,
            mask: None,
        }
    }

    /// File to open.
    pub fn open(mut self, path: impl AsRef<Path>) -> Self {
        self.open = Some(path.as_ref().to_path_buf());
        self
    }

    /// File to write.
    pub fn save(mut self, path: impl AsRef<Path>) -> Self {
        self.save = Some(path.as_ref().to_path_buf());
        self
    }

    /// Resource file to add.
    pub fn resource(mut self, path: impl AsRef<Path>) -> Self {
        self.resource = Some(path.as_ref().to_path_buf());
        self
    }

    /// Resource mask, e.g. `ICONGROUP,MAINICON,`.
    pub fn mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = Some(mask.into());
        self
    }

    /// The action this command performs.
    pub fn action(&self) -> RhAction {
        self.action
    }

    /// Command-line arguments.
    pub fn args(&self) -> Vec<OsString> {
        let mut args = Vec::with_capacity(10);
        if let Some(open) = &self.open {
            args.push("-open".into());
            args.push(open.clone().into_os_string());
        }
        args.push("-action".into());
        args.push(self.action.as_str().into());
        if let Some(save) = &self.save {
            args.push("-save".into());
            args.push(save.clone().into_os_string());
        }
        if let Some(resource) = &self.resource {
            args.push("-resource".into());
            args.push(resource.clone().into_os_string());
        }
        if let Some(mask) = &self.mask {
            args.push("-mask".into());
            args.push(mask.into());
        }
        args
    }

    /// Runs the command to completion with `tool`.
    ///
    /// # Errors
    ///
    /// [`Error::CommandFailed`] if the editor cannot be started,
    /// [`Error::ResourceTool`] on a non-zero exit or when the editor exits
    /// cleanly without producing the `-save` output.
    pub async fn run(&self, tool: &ResourceHacker) -> Result<()> {
        let args = self.args();
        log::debug!(
            "Running {} {}",
            tool.exe().display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = tool
            .command()
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::CommandFailed {
                command: tool.exe().display().to_string(),
                error: e,
            })?;

        if !output.status.success() {
            let mut stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.is_empty() {
                stderr = String::from_utf8_lossy(&output.stdout).trim().to_string();
            }
            return Err(Error::ResourceTool {
                action: self.action.to_string(),
                status: output.status.to_string(),
                stderr,
            });
        }

        if let Some(save) = &self.save {
            if !tokio::fs::try_exists(save).await.unwrap_or(false) {
                return Err(Error::ResourceTool {
                    action: self.action.to_string(),
                    status: output.status.to_string(),
                    stderr: format!("expected output {} was not written", save.display()),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cmd: &RhCommand) -> Vec<String> {
        cmd.args()
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn options_follow_fixed_order() {
        let cmd = RhCommand::new(RhAction::AddOverwrite)
            .mask("ICONGROUP,MAINICON,")
            .resource("icon.ico")
            .save("node.exe")
            .open("node.exe");
        assert_eq!(
            strings(&cmd),
            [
                "-open",
                "node.exe",
                "-action",
                "addoverwrite",
                "-save",
                "node.exe",
                "-resource",
                "icon.ico",
                "-mask",
                "ICONGROUP,MAINICON,",
            ]
        );
    }

    #[test]
    fn absent_options_are_omitted() {
        let cmd = RhCommand::new(RhAction::Delete).open("a.exe");
        assert_eq!(strings(&cmd), ["-open", "a.exe", "-action", "delete"]);
    }

    #[test]
    fn action_spellings() {
        assert_eq!(RhAction::Compile.as_str(), "compile");
        assert_eq!(RhAction::Add.as_str(), "add");
        assert_eq!(RhAction::Extract.as_str(), "extract");
        assert_eq!(RhAction::Modify.to_string(), "modify");
    }

    #[cfg(unix)]
    mod exec {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn script(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("rh.sh");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[tokio::test]
        async fn non_zero_exit_is_resource_tool_error() {
            let temp = tempfile::tempdir().unwrap();
            let tool = ResourceHacker::new(script(temp.path(), "echo boom >&2; exit 3"));
            let err = RhCommand::new(RhAction::Compile)
                .open("x.rc")
                .run(&tool)
                .await
                .unwrap_err();
            match err {
                Error::ResourceTool { action, stderr, .. } => {
                    assert_eq!(action, "compile");
                    assert_eq!(stderr, "boom");
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[tokio::test]
        async fn missing_save_output_is_reported() {
            let temp = tempfile::tempdir().unwrap();
            let tool = ResourceHacker::new(script(temp.path(), "exit 0"));
            let err = RhCommand::new(RhAction::Compile)
                .open("x.rc")
                .save(temp.path().join("never.res"))
                .run(&tool)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::ResourceTool { .. }));
        }

        #[tokio::test]
        async fn successful_run_passes_arguments() {
            let temp = tempfile::tempdir().unwrap();
            let log = temp.path().join("args.txt");
            let tool = ResourceHacker::new(script(
                temp.path(),
                &format!("echo \"$@\" > {}", log.display()),
            ));
            RhCommand::new(RhAction::Modify)
                .open("in.exe")
                .run(&tool)
                .await
                .unwrap();
            let seen = std::fs::read_to_string(&log).unwrap();
            assert_eq!(seen.trim(), "-open in.exe -action modify");
        }
    }
}
