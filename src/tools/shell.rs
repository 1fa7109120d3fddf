//! Shell command execution.

use super::ShellRunner;
use crate::error::{Error, Result};
use crate::logging::{Log, OptionalLog};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Captured output of a successful shell command.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ShellOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

/// Runs command lines through a POSIX shell.
#[derive(Clone, Debug)]
pub struct SystemShell {
    shell: PathBuf,
}

impl Default for SystemShell {
    fn default() -> Self {
        Self::new("/bin/sh")
    }
}

impl SystemShell {
    /// Uses the shell at `shell`, invoked as `<shell> -c <command>`.
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl ShellRunner for SystemShell {
    fn run(&self, command: &str, current_dir: &Path, log: Option<&Log>) -> Result<ShellOutput> {
        log.normal("[RunShellCommand]");
        log.verbose(&format!("- command: {}", command));
        log.verbose(&format!("- directory: {}", current_dir.display()));

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .current_dir(current_dir)
            .output()
            .map_err(|error| Error::CommandFailed {
                command: command.to_string(),
                error,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(Error::ShellCommand {
                command: command.to_string(),
                status: output.status.code(),
                stdout,
                stderr,
            });
        }

        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            log.verbose(&format!("> {}", line));
        }

        Ok(ShellOutput { stdout, stderr })
    }
}

/// Quotes `path` for safe interpolation into a shell command line.
pub fn quote(path: &Path) -> String {
    format!("'{}'", path.to_string_lossy().replace('\'', r"'\''"))
}
