//! External tool and filesystem collaborators.
//!
//! Every capability the pipeline needs from the outside world is a trait, so
//! [`MakeXcframework`](crate::MakeXcframework) and
//! [`AddArm64Simulator`](crate::AddArm64Simulator) can run against
//! deterministic fakes in tests. The live implementations wrap Apple's command
//! line tools:
//!
//! | Trait | Live implementation | Tool |
//! |-------|---------------------|------|
//! | [`TempDirFactory`] | [`SystemTempDir`] | `tempfile` |
//! | [`ArchDiscovery`] | [`Lipo`] | `lipo -archs` |
//! | [`FrameworkCopier`] | [`NarrowingCopier`] | copy + `lipo -extract` |
//! | [`ShellRunner`] | [`SystemShell`] | `/bin/sh -c` |
//! | [`BinaryThinner`] | [`Lipo`] | `lipo -thin` |
//! | [`BinaryMerger`] | [`Lipo`] | `lipo -create` |
//! | [`PathRemover`] | [`FsRemover`] | `std::fs` |
//! | [`XcframeworkAssembler`] | [`XcodeBuild`] | `xcodebuild -create-xcframework` |
//!
//! All calls are synchronous and blocking. None of them time out.

mod copy;
mod detect;
mod fs;
mod lipo;
mod process;
mod shell;
mod xcodebuild;

pub use copy::NarrowingCopier;
pub use detect::{ARM64_TO_SIM_ENV, LIPO_ENV, ToolPaths, XCODEBUILD_ENV, find_tool};
pub use fs::{FsRemover, SystemTempDir};
pub use lipo::Lipo;
pub use shell::{ShellOutput, SystemShell, quote};
pub use xcodebuild::XcodeBuild;

use crate::error::Result;
use crate::logging::Log;
use crate::settings::Arch;
use std::path::{Path, PathBuf};

/// Creates the per-run workspace directory.
pub trait TempDirFactory {
    /// Creates a fresh, empty directory and returns its path.
    fn create(&self, log: Option<&Log>) -> Result<PathBuf>;
}

/// Lists the architectures present in a framework's binary.
pub trait ArchDiscovery {
    /// Architectures in the order the tool reports them.
    fn archs(&self, framework: &Path, log: Option<&Log>) -> Result<Vec<Arch>>;
}

/// Copies a framework bundle narrowed to a subset of its architectures.
pub trait FrameworkCopier {
    /// Copies `framework` into `destination`, keeping only `archs` in its
    /// binary. Returns the path of the copied bundle.
    fn copy(
        &self,
        framework: &Path,
        archs: &[Arch],
        destination: &Path,
        log: Option<&Log>,
    ) -> Result<PathBuf>;
}

/// Executes shell command lines.
pub trait ShellRunner {
    /// Runs `command` through the shell with `current_dir` as working
    /// directory. A non-zero exit is an error.
    fn run(&self, command: &str, current_dir: &Path, log: Option<&Log>) -> Result<ShellOutput>;
}

/// Extracts a single architecture slice from a binary.
pub trait BinaryThinner {
    /// Writes the `arch` slice of `input` to `output`.
    fn thin(&self, input: &Path, arch: Arch, output: &Path, log: Option<&Log>) -> Result<()>;
}

/// Combines binaries into one multi-architecture binary.
pub trait BinaryMerger {
    /// Merges `inputs` into `output`. `output` may be one of the inputs.
    fn merge(&self, inputs: &[PathBuf], output: &Path, log: Option<&Log>) -> Result<()>;
}

/// Removes files and directories.
pub trait PathRemover {
    /// Removes `path`, recursively if it is a directory.
    fn remove(&self, path: &Path, log: Option<&Log>) -> Result<()>;
}

/// Produces the final XCFramework.
pub trait XcframeworkAssembler {
    /// Assembles `frameworks` into the XCFramework at `output`.
    fn create(&self, frameworks: &[PathBuf], output: &Path, log: Option<&Log>) -> Result<()>;
}
