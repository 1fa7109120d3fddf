//! Filesystem collaborators: workspace creation and path removal.

use super::{PathRemover, TempDirFactory};
use crate::error::Result;
use crate::logging::{Log, OptionalLog};
use crate::utils::fs::remove_path;
use std::path::{Path, PathBuf};

/// Creates workspace directories under the system temp directory.
///
/// The directory is kept on disk after the run so intermediate copies can be
/// inspected.
#[derive(Clone, Debug)]
pub struct SystemTempDir {
    prefix: String,
}

impl Default for SystemTempDir {
    fn default() -> Self {
        Self::with_prefix("xcframework-maker")
    }
}

impl SystemTempDir {
    /// Uses `prefix` for the generated directory names.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl TempDirFactory for SystemTempDir {
    fn create(&self, log: Option<&Log>) -> Result<PathBuf> {
        let path = tempfile::Builder::new()
            .prefix(&self.prefix)
            .tempdir()?
            .keep();
        log.normal("[CreateTempDir]");
        log.verbose(&format!("- path: {}", path.display()));
        Ok(path)
    }
}

/// Removes paths with `std::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsRemover;

impl PathRemover for FsRemover {
    fn remove(&self, path: &Path, log: Option<&Log>) -> Result<()> {
        log.normal("[DeletePath]");
        log.verbose(&format!("- path: {}", path.display()));
        remove_path(path)
    }
}
