//! Centralized command execution with consistent error handling.
//!
//! External programs are run through [`Cmd`], which always captures stdout
//! and stderr so failures carry useful messages.

use anyhow::{Context, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Result of a command execution.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit status of the command.
    pub status: ExitStatus,
    /// Captured stdout as a string.
    pub stdout: String,
    /// Captured stderr as a string.
    pub stderr: String,
}

impl CommandResult {
    /// Returns true if the command exited successfully.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Get the exit code, or -1 if terminated by signal.
    pub fn code(&self) -> i32 {
        self.status.code().unwrap_or(-1)
    }

    /// stdout followed by stderr, as one text stream.
    pub fn combined_output(&self) -> String {
        let mut out = String::with_capacity(self.stdout.len() + self.stderr.len() + 1);
        out.push_str(&self.stdout);
        if !self.stdout.is_empty() && !self.stdout.ends_with('\n') && !self.stderr.is_empty() {
            out.push('\n');
        }
        out.push_str(&self.stderr);
        out
    }
}

/// Builder for configuring command execution.
///
/// Program and arguments are kept as OS strings, so paths reach the child
/// byte for byte.
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
        }
    }

    /// Add a single argument. Accepts strings and paths alike.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// The command line as it would be typed, for logs.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the command to completion and capture output.
    ///
    /// A non-zero exit is returned as a result, not an error; only failing
    /// to start the program is.
    pub fn run(self) -> Result<CommandResult> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        tracing::debug!(command = %self.display(), "running command");

        let output = cmd.output().with_context(|| {
            format!(
                "Failed to execute '{}'. Is it installed?",
                self.program.to_string_lossy()
            )
        })?;

        Ok(CommandResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Locate a program.
///
/// Names containing a path separator are checked as paths; bare names are
/// looked up in PATH.
pub fn which(program: &str) -> Option<PathBuf> {
    let path = Path::new(program);
    if path.components().count() > 1 {
        return path.is_file().then(|| path.to_path_buf());
    }
    which::which(program).ok()
}

/// Check if a program exists (bool version).
pub fn exists(program: &str) -> bool {
    which(program).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_success() {
        let result = Cmd::new("echo").arg("hello").run().unwrap();
        assert!(result.success());
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    fn test_run_nonzero_exit_is_not_an_error() {
        let result = Cmd::new("ls")
            .arg("/nonexistent_path_12345")
            .run()
            .unwrap();

        assert!(!result.success());
        assert_ne!(result.code(), 0);
        assert!(!result.stderr.is_empty());
    }

    #[test]
    fn test_missing_program() {
        let err = Cmd::new("nonexistent_program_12345").run().unwrap_err();
        assert!(err.to_string().contains("Is it installed?"));
    }

    #[test]
    fn test_combined_output_joins_streams() {
        let result = Cmd::new("sh")
            .arg("-c")
            .arg("printf out; echo err >&2")
            .run()
            .unwrap();
        assert_eq!(result.combined_output(), "out\nerr\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_argument_passed_unchanged() {
        use std::os::unix::ffi::OsStrExt;

        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join(OsStr::from_bytes(b"caf\xe9.kb"));
        if std::fs::write(&path, "x").is_err() {
            // Filesystem rejects non-UTF-8 names
            return;
        }

        let result = Cmd::new("sh")
            .arg("-c")
            .arg("test -f \"$1\"")
            .arg("sh")
            .arg(&path)
            .run()
            .unwrap();
        assert!(result.success());
    }

    #[test]
    fn test_display() {
        let cmd = Cmd::new("dotnet")
            .arg("kbpack.dll")
            .arg(Path::new("/tmp/stage"));
        assert_eq!(cmd.display(), "dotnet kbpack.dll /tmp/stage");
    }

    #[test]
    fn test_which() {
        assert!(exists("sh"));
        assert!(!exists("nonexistent_program_12345"));
        assert!(which("/nonexistent/dir/tool").is_none());
        assert!(which("/bin/sh").is_some());
    }
}
