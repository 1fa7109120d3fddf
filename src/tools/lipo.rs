//! `lipo` wrapper: architecture discovery, thinning, extraction and merging
//! of Mach-O binaries.

use super::process::run_tool;
use super::{ArchDiscovery, BinaryMerger, BinaryThinner};
use crate::error::{ErrorExt, Result};
use crate::logging::{Log, OptionalLog};
use crate::settings::Arch;
use crate::utils::fs::framework_binary;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Apple's `lipo` tool.
#[derive(Clone, Debug)]
pub struct Lipo {
    program: PathBuf,
}

impl Default for Lipo {
    fn default() -> Self {
        Self::new("lipo")
    }
}

impl Lipo {
    /// Uses the `lipo` executable at `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Architectures present in a binary file.
    ///
    /// Command: `lipo -archs <binary>`
    pub fn binary_archs(&self, binary: &Path) -> Result<Vec<Arch>> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-archs").arg(binary);
        let output = run_tool("lipo", cmd)?;
        parse_archs(&String::from_utf8_lossy(&output.stdout))
    }

    /// Whether `binary` is a fat (universal) file.
    ///
    /// Command: `lipo -info <binary>`
    pub fn is_fat(&self, binary: &Path) -> Result<bool> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-info").arg(binary);
        let output = run_tool("lipo", cmd)?;
        Ok(is_fat_info(&String::from_utf8_lossy(&output.stdout)))
    }

    /// Keeps only `archs` of a fat binary.
    ///
    /// The result stays a fat file even for a single architecture, so it can
    /// be thinned again later.
    ///
    /// Command: `lipo <input> -extract <a> [-extract <b> ...] -output <output>`
    pub fn extract(
        &self,
        input: &Path,
        archs: &[Arch],
        output: &Path,
        log: Option<&Log>,
    ) -> Result<()> {
        log.normal("[LipoExtract]");
        log.verbose(&format!("- input: {}", input.display()));
        log.verbose(&format!("- archs: {}", arch_list(archs)));
        log.verbose(&format!("- output: {}", output.display()));

        let mut cmd = Command::new(&self.program);
        cmd.arg(input);
        for arch in archs {
            cmd.arg("-extract").arg(arch.lipo_name());
        }
        cmd.arg("-output").arg(output);
        run_tool("lipo", cmd)?;
        Ok(())
    }
}

impl ArchDiscovery for Lipo {
    fn archs(&self, framework: &Path, log: Option<&Log>) -> Result<Vec<Arch>> {
        log.normal("[GetArchs]");
        log.verbose(&format!("- framework: {}", framework.display()));

        let archs = self.binary_archs(&framework_binary(framework)?)?;
        log.verbose(&format!("- archs: {}", arch_list(&archs)));
        Ok(archs)
    }
}

impl BinaryThinner for Lipo {
    fn thin(&self, input: &Path, arch: Arch, output: &Path, log: Option<&Log>) -> Result<()> {
        log.normal("[LipoThin]");
        log.verbose(&format!("- input: {}", input.display()));
        log.verbose(&format!("- arch: {}", arch));
        log.verbose(&format!("- output: {}", output.display()));

        // `-thin` rejects non-fat input, which is already the requested slice.
        if !self.is_fat(input)? && self.binary_archs(input)? == [arch] {
            log::debug!("{} is a thin {} binary, copying", input.display(), arch);
            fs::copy(input, output).fs_context("copying thin binary", input)?;
            return Ok(());
        }

        let mut cmd = Command::new(&self.program);
        cmd.arg(input)
            .arg("-thin")
            .arg(arch.lipo_name())
            .arg("-output")
            .arg(output);
        run_tool("lipo", cmd)?;
        Ok(())
    }
}

impl BinaryMerger for Lipo {
    fn merge(&self, inputs: &[PathBuf], output: &Path, log: Option<&Log>) -> Result<()> {
        log.normal("[LipoCreate]");
        for input in inputs {
            log.verbose(&format!("- input: {}", input.display()));
        }
        log.verbose(&format!("- output: {}", output.display()));

        let mut cmd = Command::new(&self.program);
        cmd.arg("-create").args(inputs).arg("-output").arg(output);
        run_tool("lipo", cmd)?;
        Ok(())
    }
}

/// Parses `lipo -archs` output, e.g. `"i386 x86_64 armv7 arm64\n"`.
fn parse_archs(stdout: &str) -> Result<Vec<Arch>> {
    let mut archs = Vec::new();
    for name in stdout.split_whitespace() {
        let arch = name.parse::<Arch>()?;
        if !archs.contains(&arch) {
            archs.push(arch);
        }
    }
    Ok(archs)
}

/// `lipo -info` prints `Non-fat file: <path> is architecture: <arch>` for thin
/// binaries and `Architectures in the fat file: ...` otherwise.
fn is_fat_info(stdout: &str) -> bool {
    !stdout.trim_start().starts_with("Non-fat file")
}

fn arch_list(archs: &[Arch]) -> String {
    archs
        .iter()
        .map(Arch::lipo_name)
        .collect::<Vec<_>>()
        .join(", ")
}
