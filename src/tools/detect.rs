//! Locating the external programs the pipeline drives.

use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Environment variable overriding the `lipo` lookup.
pub const LIPO_ENV: &str = "XCFRAMEWORK_LIPO";
/// Environment variable overriding the `xcodebuild` lookup.
pub const XCODEBUILD_ENV: &str = "XCFRAMEWORK_XCODEBUILD";
/// Environment variable overriding the `arm64-to-sim` lookup.
pub const ARM64_TO_SIM_ENV: &str = "ARM64_TO_SIM";

/// Resolved tool locations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ToolPaths {
    /// `lipo`
    pub lipo: PathBuf,
    /// `xcodebuild`
    pub xcodebuild: PathBuf,
    /// `arm64-to-sim` object converter. Only needed when patching.
    pub arm64_to_sim: Option<PathBuf>,
}

impl ToolPaths {
    /// Finds every tool, honouring the environment overrides.
    ///
    /// `lipo` and `xcodebuild` are mandatory. A missing `arm64-to-sim` is only
    /// an error once a patch actually runs.
    pub fn detect() -> Result<Self> {
        let lipo = find_tool("lipo", LIPO_ENV).ok_or(Error::ToolNotFound {
            tool: "lipo",
            env_var: LIPO_ENV,
        })?;
        let xcodebuild = find_tool("xcodebuild", XCODEBUILD_ENV).ok_or(Error::ToolNotFound {
            tool: "xcodebuild",
            env_var: XCODEBUILD_ENV,
        })?;
        let arm64_to_sim = find_tool("arm64-to-sim", ARM64_TO_SIM_ENV);

        Ok(Self {
            lipo,
            xcodebuild,
            arm64_to_sim,
        })
    }
}

/// Looks up `name`, checking `env_var` first and then `PATH`.
pub fn find_tool(name: &str, env_var: &str) -> Option<PathBuf> {
    if let Some(value) = env::var_os(env_var).filter(|v| !v.is_empty()) {
        let path = PathBuf::from(value);
        if path.is_file() {
            log::debug!("Using {} from {}: {}", name, env_var, path.display());
            return Some(path);
        }
        log::warn!(
            "{} points at {} which is not a file, falling back to PATH lookup for {}",
            env_var,
            path.display(),
            name
        );
    }

    match which::which(name) {
        Ok(path) => {
            log::info!("✓ {} available: {}", name, path.display());
            Some(path)
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", name, e);
            None
        }
    }
}
