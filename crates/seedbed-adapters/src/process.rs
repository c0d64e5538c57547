//! Blocking subprocess execution shared by the tool adapters.

use std::path::Path;
use std::process::Command;

use seedbed_core::application::ports::ToolFailure;
use tracing::{debug, trace};

/// Runs one external program in a working directory.
///
/// No timeout: a hung tool hangs the run, and cancellation is left to
/// whoever started seedbed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRunner {
    program: String,
}

impl CommandRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Human-readable command line, used in failure messages.
    pub fn display(&self, args: &[&str]) -> String {
        std::iter::once(self.program.as_str())
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion; trimmed stdout on success.
    pub fn run(&self, cwd: &Path, args: &[&str]) -> Result<String, ToolFailure> {
        let command_line = self.display(args);
        debug!(command = %command_line, cwd = %cwd.display(), "running");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|e| ToolFailure::new(&command_line, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let reason = if stderr.is_empty() {
                output.status.to_string()
            } else {
                stderr
            };
            return Err(ToolFailure::new(command_line, reason));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        trace!(command = %command_line, %stdout, "finished");
        Ok(stdout)
    }

    /// Run, discarding stdout.
    pub fn status(&self, cwd: &Path, args: &[&str]) -> Result<(), ToolFailure> {
        self.run(cwd, args).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_program_and_args() {
        let runner = CommandRunner::new("poetry");
        assert_eq!(runner.display(&["add", "--group", "test", "pytest"]), "poetry add --group test pytest");
    }

    #[test]
    fn missing_program_is_a_tool_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = CommandRunner::new("seedbed-definitely-not-installed")
            .run(dir.path(), &["--version"])
            .unwrap_err();
        assert_eq!(err.command, "seedbed-definitely-not-installed --version");
        assert!(!err.reason.is_empty());
    }
}
