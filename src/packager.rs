//! External packager invocation.
//!
//! A typical command line looks like:
//! ```text
//! dotnet kbpack.dll pack -s /home/alice/.kbpack/staging/kbpack-x1Y2 -o /tmp/out/Esc.kb
//! ```
//! The packager's exit code is unreliable, so the only success signal is a
//! fixed marker line somewhere in its output.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::process::{self, Cmd};

/// Marker the packager prints when the archive was written.
pub const SUCCESS_MARKER: &str = "Knowledge base package creation completed successfully";

/// Captured packager run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingOutcome {
    /// stdout followed by stderr.
    pub output: String,
    /// Exit code, for diagnostics only; -1 if killed by a signal.
    pub exit_code: i32,
    pub success: bool,
}

/// Classify packager output: success iff it contains [`SUCCESS_MARKER`].
pub fn interpret_output(output: &str) -> bool {
    output.contains(SUCCESS_MARKER)
}

/// The packaging tool, optionally run under a launcher such as `dotnet`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packager {
    pub tool: PathBuf,
    pub runtime: Option<String>,
}

impl Packager {
    pub fn new(tool: impl Into<PathBuf>, runtime: Option<String>) -> Self {
        Self {
            tool: tool.into(),
            runtime,
        }
    }

    /// Check the tool (and launcher, if any) can be found.
    pub fn ensure_available(&self) -> Result<()> {
        if !self.tool.is_file() {
            anyhow::bail!(
                "Packaging tool not found at {}. Set KBPACK_PACKAGER to the packager path.",
                self.tool.display()
            );
        }
        if let Some(runtime) = &self.runtime {
            if !process::exists(runtime) {
                anyhow::bail!(
                    "Runtime '{}' for the packaging tool is not installed or not in PATH.",
                    runtime
                );
            }
        }
        Ok(())
    }

    fn command(&self, staging_root: &Path, output: &Path) -> Cmd {
        let cmd = match &self.runtime {
            Some(runtime) => Cmd::new(runtime).arg(&self.tool),
            None => Cmd::new(&self.tool),
        };
        cmd.arg("pack")
            .arg("-s")
            .arg(staging_root)
            .arg("-o")
            .arg(output)
    }

    /// Run `pack -s <staging_root> -o <output>` and wait for it to exit.
    ///
    /// A non-zero exit is not an error here; only failing to start the
    /// process is.
    pub fn pack(&self, staging_root: &Path, output: &Path) -> Result<PackagingOutcome> {
        let cmd = self.command(staging_root, output);
        tracing::info!(command = %cmd.display(), "invoking packager");

        let result = cmd.run()?;
        let output = result.combined_output();
        let success = interpret_output(&output);

        tracing::debug!(exit_code = result.code(), success, "packager finished");

        Ok(PackagingOutcome {
            output,
            exit_code: result.code(),
            success,
        })
    }
}
