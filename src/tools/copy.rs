//! Framework copy narrowed to an architecture subset.

use super::{FrameworkCopier, Lipo};
use crate::error::{Error, ErrorExt, Result};
use crate::logging::{Log, OptionalLog};
use crate::settings::Arch;
use crate::utils::fs::{copy_dir, framework_binary, remove_path};
use std::fs;
use std::path::{Path, PathBuf};

/// Copies a bundle with `walkdir`, then strips unwanted slices from its binary
/// with `lipo`.
#[derive(Clone, Debug, Default)]
pub struct NarrowingCopier {
    lipo: Lipo,
}

impl NarrowingCopier {
    /// Narrows binaries with the given `lipo`.
    pub fn new(lipo: Lipo) -> Self {
        Self { lipo }
    }
}

impl FrameworkCopier for NarrowingCopier {
    fn copy(
        &self,
        framework: &Path,
        archs: &[Arch],
        destination: &Path,
        log: Option<&Log>,
    ) -> Result<PathBuf> {
        log.normal("[CopyFramework]");
        log.verbose(&format!("- framework: {}", framework.display()));
        log.verbose(&format!(
            "- archs: {}",
            archs.iter().map(Arch::lipo_name).collect::<Vec<_>>().join(", ")
        ));
        log.verbose(&format!("- destination: {}", destination.display()));

        if archs.is_empty() {
            return Err(Error::EmptyArchSelection {
                framework: framework.to_path_buf(),
            });
        }

        let name = framework
            .file_name()
            .ok_or_else(|| Error::InvalidFramework(framework.to_path_buf()))?;
        let copy = destination.join(name);

        if fs::symlink_metadata(&copy).is_ok() {
            log::debug!("Replacing previous copy at {}", copy.display());
            remove_path(&copy)?;
        }
        copy_dir(framework, &copy)?;

        let binary = framework_binary(&copy)?;
        let present = self.lipo.binary_archs(&binary)?;
        if present.len() == archs.len() && archs.iter().all(|a| present.contains(a)) {
            log.verbose("- binary already matches, nothing to strip");
            return Ok(copy);
        }

        let mut narrowed = binary.clone().into_os_string();
        narrowed.push(".narrowed");
        let narrowed = PathBuf::from(narrowed);

        // `-extract` keeps a fat wrapper even for one slice; the arm64 patch
        // thins the device copy again and `-thin` only takes fat input.
        self.lipo
            .extract(&binary, archs, &narrowed, log.indented().as_ref())?;
        fs::rename(&narrowed, &binary).fs_context("replacing framework binary", &binary)?;

        Ok(copy)
    }
}
