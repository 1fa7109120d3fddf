//! Final XCFramework assembly with `xcodebuild`.

use super::XcframeworkAssembler;
use super::process::run_tool;
use crate::error::Result;
use crate::logging::{Log, OptionalLog};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Apple's `xcodebuild`, used only for `-create-xcframework`.
#[derive(Clone, Debug)]
pub struct XcodeBuild {
    program: PathBuf,
}

impl Default for XcodeBuild {
    fn default() -> Self {
        Self::new("xcodebuild")
    }
}

impl XcodeBuild {
    /// Uses the `xcodebuild` executable at `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, frameworks: &[PathBuf], output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-create-xcframework");
        for framework in frameworks {
            cmd.arg("-framework").arg(framework);
        }
        cmd.arg("-output").arg(output);
        cmd
    }
}

impl XcframeworkAssembler for XcodeBuild {
    fn create(&self, frameworks: &[PathBuf], output: &Path, log: Option<&Log>) -> Result<()> {
        log.normal("[CreateXcframework]");
        for framework in frameworks {
            log.verbose(&format!("- framework: {}", framework.display()));
        }
        log.verbose(&format!("- output: {}", output.display()));

        run_tool("xcodebuild", self.command(frameworks, output))?;
        Ok(())
    }
}
