//! Child process helpers shared by the tool wrappers.

use crate::error::{Error, Result};
use std::process::{Command, Output};

/// Renders a command as a single line for logs and error messages.
pub(crate) fn command_line(cmd: &Command) -> String {
    let mut line = cmd.get_program().to_string_lossy().into_owned();
    for arg in cmd.get_args() {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

/// Runs a tool to completion and captures its output.
///
/// A spawn failure is [`Error::CommandFailed`], a non-zero exit
/// [`Error::ToolFailed`] carrying the captured stderr.
pub(crate) fn run_tool(tool: &'static str, mut cmd: Command) -> Result<Output> {
    let command = command_line(&cmd);
    log::debug!("Running: {}", command);

    let output = cmd.output().map_err(|error| Error::CommandFailed {
        command: command.clone(),
        error,
    })?;

    if !output.status.success() {
        return Err(Error::ToolFailed {
            tool,
            command,
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output)
}
