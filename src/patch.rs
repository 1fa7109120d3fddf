//! Arm64 simulator slice patching.
//!
//! Xcode does not produce an arm64 *simulator* slice for these frameworks, and a
//! device arm64 slice is rejected by the simulator. This module synthesizes one
//! from the device binary and merges it into the simulator binary in place.
//!
//! # How It Works
//!
//! 1. Thin the device binary to its arm64 slice, written next to the simulator
//!    binary as `<simulator binary>-arm64`
//! 2. Unpack the slice (a static archive) into a fresh scratch directory
//! 3. Run `arm64-to-sim` on every object file
//! 4. Repack the converted objects over the side file
//! 5. Merge the side file into the simulator binary with `lipo -create`
//! 6. Delete the side file
//!
//! `arm64-to-sim` only accepts relocatable object files, which is why the
//! archive is unpacked instead of converting the slice in one call.
//!
//! The scratch directory is unique per invocation and is removed on every
//! exit path, so concurrent patches never see each other's object files.

use crate::error::{Error, ErrorExt, Result};
use crate::logging::{Log, OptionalLog};
use crate::settings::Arch;
use crate::tools::{
    ARM64_TO_SIM_ENV, BinaryMerger, BinaryThinner, FsRemover, Lipo, PathRemover, ShellRunner,
    SystemShell, ToolPaths, quote,
};
use crate::utils::fs::framework_binary;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Adds an arm64 simulator slice to a framework copy.
pub trait SimulatorPatcher {
    /// Patches the binary of `simulator` using the arm64 slice of `device`.
    fn add_arm64_simulator(&self, device: &Path, simulator: &Path, log: Option<&Log>)
    -> Result<()>;
}

/// Live [`SimulatorPatcher`] driving `lipo`, `ar` and `arm64-to-sim`.
pub struct AddArm64Simulator {
    thinner: Box<dyn BinaryThinner>,
    shell: Box<dyn ShellRunner>,
    merger: Box<dyn BinaryMerger>,
    remover: Box<dyn PathRemover>,
    arm64_to_sim: Option<PathBuf>,
    scratch_root: PathBuf,
}

impl AddArm64Simulator {
    /// Creates a patcher from explicit collaborators.
    ///
    /// `arm64_to_sim` is the object converter. `None` makes every patch fail
    /// with [`Error::ToolNotFound`] before touching any file.
    pub fn new(
        thinner: Box<dyn BinaryThinner>,
        shell: Box<dyn ShellRunner>,
        merger: Box<dyn BinaryMerger>,
        remover: Box<dyn PathRemover>,
        arm64_to_sim: Option<PathBuf>,
    ) -> Self {
        Self {
            thinner,
            shell,
            merger,
            remover,
            arm64_to_sim,
            scratch_root: std::env::temp_dir(),
        }
    }

    /// Patcher wired to the real tools.
    pub fn live(tools: &ToolPaths) -> Self {
        let lipo = Lipo::new(&tools.lipo);
        Self::new(
            Box::new(lipo.clone()),
            Box::new(SystemShell::default()),
            Box::new(lipo),
            Box::new(FsRemover),
            tools.arm64_to_sim.clone(),
        )
    }

    /// Creates scratch directories under `root` instead of the system temp dir.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = root.into();
        self
    }

    fn convert_slice(&self, side_file: &Path, tool: &Path, log: Option<&Log>) -> Result<()> {
        let scratch = tempfile::Builder::new()
            .prefix("arm64-to-sim")
            .tempdir_in(&self.scratch_root)
            .fs_context("creating scratch directory", &self.scratch_root)?;
        log::debug!("Unpacking arm64 slice in {}", scratch.path().display());

        let side = quote(side_file);
        let steps = [
            format!("ar x {side}"),
            format!("for i in *.o ; do {} \"$i\" ; done", quote(tool)),
            format!("ar crv {side} *.o"),
        ];
        for step in &steps {
            self.shell.run(step, scratch.path(), log)?;
        }

        scratch
            .close()
            .fs_context("removing scratch directory", &self.scratch_root)
    }
}

impl SimulatorPatcher for AddArm64Simulator {
    fn add_arm64_simulator(
        &self,
        device: &Path,
        simulator: &Path,
        log: Option<&Log>,
    ) -> Result<()> {
        log.normal("[AddArm64Simulator]");
        log.verbose(&format!("- device: {}", device.display()));
        log.verbose(&format!("- simulator: {}", simulator.display()));

        let tool = self.arm64_to_sim.as_deref().ok_or(Error::ToolNotFound {
            tool: "arm64-to-sim",
            env_var: ARM64_TO_SIM_ENV,
        })?;

        let device_binary = framework_binary(device)?;
        let simulator_binary = framework_binary(simulator)?;

        let mut side_file = simulator_binary.clone().into_os_string();
        side_file.push("-arm64");
        let side_file = PathBuf::from(side_file)
            .absolutize()
            .fs_context("resolving arm64 slice path", &simulator_binary)?
            .into_owned();

        let inner = log.indented();
        let inner = inner.as_ref();

        self.thinner
            .thin(&device_binary, Arch::Arm64, &side_file, inner)?;
        self.convert_slice(&side_file, tool, inner)?;
        self.merger.merge(
            &[simulator_binary.clone(), side_file.clone()],
            &simulator_binary,
            inner,
        )?;
        self.remover.remove(&side_file, inner)
    }
}
