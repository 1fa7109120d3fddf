//! # XCFramework Maker
//!
//! Assembles a universal XCFramework from separately built iOS and tvOS
//! `.framework` bundles, optionally patching in arm64 *simulator* slices that
//! Xcode does not produce for them.
//!
//! ## Features
//!
//! - **Architecture Splitting**: Each platform framework is copied twice, once
//!   narrowed to device slices (armv7, arm64) and once to simulator slices
//!   (i386, x86_64)
//! - **Arm64 Simulator Patching**: Device arm64 slices are converted object by
//!   object with `arm64-to-sim` and merged into the simulator copy
//! - **Injectable Tools**: Every external tool sits behind a trait, so the
//!   pipeline runs against fakes in tests
//! - **Nested Logging**: Each step logs under the step that triggered it
//!
//! ## Usage
//!
//! ```no_run
//! use xcframework_maker::{Log, MakeXcframework, SettingsBuilder, ToolPaths};
//!
//! # fn main() -> xcframework_maker::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .ios("build/ios/Sdk.framework")
//!     .arm64_simulator(true)
//!     .output("dist/Sdk.xcframework")
//!     .build()?;
//!
//! MakeXcframework::live(&ToolPaths::detect()?).build(&settings, Some(&Log::facade()))?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod builder;
pub mod error;
pub mod logging;
pub mod patch;
pub mod settings;
pub mod tools;

mod utils;

pub use builder::MakeXcframework;
pub use error::{Error, Result};
pub use logging::{Log, LogLevel, OptionalLog};
pub use patch::{AddArm64Simulator, SimulatorPatcher};
pub use settings::{Arch, Platform, Settings, SettingsBuilder, select_archs};
pub use tools::ToolPaths;
