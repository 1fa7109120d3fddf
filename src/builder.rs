//! XCFramework build orchestration.
//!
//! [`MakeXcframework`] drives one build:
//! 1. Rejects a run with no platform input
//! 2. Creates a single workspace directory
//! 3. Per platform, discovers the binary's architectures and copies the
//!    framework twice, narrowed to its device and simulator slices
//! 4. Optionally patches an arm64 simulator slice into the simulator copy
//! 5. Assembles all copies into the output XCFramework
//!
//! # Example
//!
//! ```no_run
//! use xcframework_maker::{Log, MakeXcframework, SettingsBuilder, ToolPaths};
//!
//! # fn example() -> xcframework_maker::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .ios("build/ios/Sdk.framework")
//!     .tvos("build/tvos/Sdk.framework")
//!     .arm64_simulator(true)
//!     .output("dist/Sdk.xcframework")
//!     .build()?;
//!
//! let maker = MakeXcframework::live(&ToolPaths::detect()?);
//! maker.build(&settings, Some(&Log::terminal(false)))?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use crate::logging::{Log, OptionalLog};
use crate::patch::{AddArm64Simulator, SimulatorPatcher};
use crate::settings::{Arch, Platform, Settings, select_archs};
use crate::tools::{
    ArchDiscovery, FrameworkCopier, Lipo, NarrowingCopier, SystemTempDir, TempDirFactory,
    ToolPaths, XcframeworkAssembler, XcodeBuild,
};
use std::path::{Path, PathBuf};

/// Builds an XCFramework from per-platform framework bundles.
pub struct MakeXcframework {
    temp_dir: Box<dyn TempDirFactory>,
    discovery: Box<dyn ArchDiscovery>,
    copier: Box<dyn FrameworkCopier>,
    patcher: Box<dyn SimulatorPatcher>,
    assembler: Box<dyn XcframeworkAssembler>,
}

impl MakeXcframework {
    /// Creates an orchestrator from explicit collaborators.
    pub fn new(
        temp_dir: Box<dyn TempDirFactory>,
        discovery: Box<dyn ArchDiscovery>,
        copier: Box<dyn FrameworkCopier>,
        patcher: Box<dyn SimulatorPatcher>,
        assembler: Box<dyn XcframeworkAssembler>,
    ) -> Self {
        Self {
            temp_dir,
            discovery,
            copier,
            patcher,
            assembler,
        }
    }

    /// Orchestrator wired to the real tools.
    pub fn live(tools: &ToolPaths) -> Self {
        let lipo = Lipo::new(&tools.lipo);
        Self::new(
            Box::new(SystemTempDir::default()),
            Box::new(lipo.clone()),
            Box::new(NarrowingCopier::new(lipo)),
            Box::new(AddArm64Simulator::live(tools)),
            Box::new(XcodeBuild::new(&tools.xcodebuild)),
        )
    }

    /// Runs the build described by `settings`.
    ///
    /// Fails with [`Error::EmptyInput`] before doing anything else when no
    /// platform framework is supplied. Any collaborator error aborts the run
    /// and is returned unchanged after being logged with its
    /// [recovery suggestions](Error::recovery_suggestions). The workspace is
    /// left on disk.
    pub fn build(&self, settings: &Settings, log: Option<&Log>) -> Result<()> {
        if settings.is_empty() {
            return Err(Error::EmptyInput);
        }

        log.normal("[MakeXcframework]");
        log.verbose(&format!("- ios: {}", display_input(settings.ios.as_deref())));
        log.verbose(&format!("- tvos: {}", display_input(settings.tvos.as_deref())));
        log.verbose(&format!("- arm64_simulator: {}", settings.arm64_simulator));
        log.verbose(&format!("- output: {}", settings.output.display()));

        let result = self.run(settings, log.indented().as_ref());
        if let Err(error) = &result {
            log.normal(&format!("[MakeXcframework] failed: {error}"));
            for hint in error.recovery_suggestions() {
                log.verbose(&format!("- hint: {hint}"));
            }
        }
        result
    }

    fn run(&self, settings: &Settings, inner: Option<&Log>) -> Result<()> {
        let workspace = self.temp_dir.create(inner)?;
        let mut frameworks = Vec::new();

        for (platform, input) in settings.inputs() {
            let archs = self.discovery.archs(input, inner)?;
            let device_archs = select_archs(&archs, &Arch::DEVICE);
            let simulator_archs = select_archs(&archs, &Arch::SIMULATOR);

            let [device_dir, simulator_dir] = workspace_dirs(&workspace, platform);

            let device = self.copier.copy(input, &device_archs, &device_dir, inner)?;
            let simulator = self
                .copier
                .copy(input, &simulator_archs, &simulator_dir, inner)?;

            if settings.arm64_simulator {
                self.patcher.add_arm64_simulator(&device, &simulator, inner)?;
            }

            frameworks.push(device);
            frameworks.push(simulator);
        }

        self.assembler
            .create(&frameworks, &settings.output, inner)
    }
}

fn display_input(path: Option<&Path>) -> String {
    path.map_or_else(|| "none".to_string(), |p| p.display().to_string())
}

/// Workspace subdirectories used for `platform`, device first.
fn workspace_dirs(workspace: &Path, platform: Platform) -> [PathBuf; 2] {
    [
        workspace.join(format!("{}-device", platform.dir_name())),
        workspace.join(format!("{}-simulator", platform.dir_name())),
    ]
}
