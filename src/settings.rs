//! Build configuration: target platforms, CPU architectures and run settings.
//!
//! [`Settings`] describes one XCFramework build and is normally created with
//! [`SettingsBuilder`]:
//!
//! ```no_run
//! use xcframework_maker::SettingsBuilder;
//!
//! let settings = SettingsBuilder::new()
//!     .ios("build/ios/Sdk.framework")
//!     .tvos("build/tvos/Sdk.framework")
//!     .arm64_simulator(true)
//!     .output("dist/Sdk.xcframework")
//!     .build()?;
//! # Ok::<(), xcframework_maker::Error>(())
//! ```

use crate::bail;
use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// CPU architecture of a framework binary slice.
///
/// The set is closed: any other slice reported by `lipo` is rejected with
/// [`Error::UnsupportedArch`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Arch {
    /// 32-bit Intel, simulator only
    I386,
    /// 64-bit Intel, simulator only
    X86_64,
    /// 32-bit ARM, device only
    Armv7,
    /// 64-bit ARM, device (simulator slices are synthesized by the patcher)
    Arm64,
}

impl Arch {
    /// Architectures that run on physical devices.
    pub const DEVICE: [Arch; 2] = [Arch::Armv7, Arch::Arm64];

    /// Architectures carried over into the simulator copy.
    ///
    /// Arm64 is excluded even when present: a device arm64 slice is not valid in
    /// a simulator binary and is injected separately by
    /// [`AddArm64Simulator`](crate::AddArm64Simulator).
    pub const SIMULATOR: [Arch; 2] = [Arch::I386, Arch::X86_64];

    /// Name used by `lipo` and the Mach-O tooling.
    pub fn lipo_name(&self) -> &'static str {
        match self {
            Arch::I386 => "i386",
            Arch::X86_64 => "x86_64",
            Arch::Armv7 => "armv7",
            Arch::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.lipo_name())
    }
}

impl FromStr for Arch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "i386" => Ok(Arch::I386),
            "x86_64" => Ok(Arch::X86_64),
            "armv7" => Ok(Arch::Armv7),
            "arm64" => Ok(Arch::Arm64),
            other => Err(Error::UnsupportedArch(other.to_string())),
        }
    }
}

/// Keeps the members of `discovered` that appear in `allowed`.
///
/// Order follows `discovered`; duplicates are dropped.
pub fn select_archs(discovered: &[Arch], allowed: &[Arch]) -> Vec<Arch> {
    let mut selected = Vec::with_capacity(allowed.len());
    for arch in discovered {
        if allowed.contains(arch) && !selected.contains(arch) {
            selected.push(*arch);
        }
    }
    selected
}

/// Platform family of an input framework.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Platform {
    /// iPhone / iPad
    Ios,
    /// Apple TV
    TvOs,
}

impl Platform {
    /// Processing order for a build.
    pub const ALL: [Platform; 2] = [Platform::Ios, Platform::TvOs];

    /// Lowercase name used for workspace subdirectories.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::TvOs => "tvos",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Parameters of one XCFramework build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// iOS framework bundle
    pub ios: Option<PathBuf>,
    /// tvOS framework bundle
    pub tvos: Option<PathBuf>,
    /// Whether arm64 simulator slices are synthesized from the device slice
    pub arm64_simulator: bool,
    /// Destination `.xcframework` path
    pub output: PathBuf,
}

impl Settings {
    /// Input framework for the given platform, if supplied.
    fn input(&self, platform: Platform) -> Option<&Path> {
        match platform {
            Platform::Ios => self.ios.as_deref(),
            Platform::TvOs => self.tvos.as_deref(),
        }
    }

    /// Supplied inputs in [`Platform::ALL`] order.
    pub fn inputs(&self) -> impl Iterator<Item = (Platform, &Path)> + '_ {
        Platform::ALL
            .into_iter()
            .filter_map(|platform| self.input(platform).map(|path| (platform, path)))
    }

    /// Returns true when no platform framework was supplied.
    pub fn is_empty(&self) -> bool {
        self.inputs().next().is_none()
    }
}

/// Builder for [`Settings`].
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    ios: Option<PathBuf>,
    tvos: Option<PathBuf>,
    arm64_simulator: bool,
    output: Option<PathBuf>,
}

impl SettingsBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the iOS framework bundle.
    pub fn ios(mut self, path: impl Into<PathBuf>) -> Self {
        self.ios = Some(path.into());
        self
    }

    /// Sets the tvOS framework bundle.
    pub fn tvos(mut self, path: impl Into<PathBuf>) -> Self {
        self.tvos = Some(path.into());
        self
    }

    /// Enables arm64 simulator patching.
    pub fn arm64_simulator(mut self, enabled: bool) -> Self {
        self.arm64_simulator = enabled;
        self
    }

    /// Sets the destination `.xcframework` path.
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Builds the settings.
    ///
    /// An output path is required. Missing platform inputs are not rejected
    /// here; [`MakeXcframework::build`](crate::MakeXcframework::build) reports
    /// them as [`Error::EmptyInput`].
    pub fn build(self) -> Result<Settings> {
        let Some(output) = self.output else {
            bail!("output path is required");
        };

        Ok(Settings {
            ios: self.ios,
            tvos: self.tvos,
            arm64_simulator: self.arm64_simulator,
            output,
        })
    }
}
