//! File system utilities for framework bundles.
//!
//! Provides bundle copying with symlink preservation (framework bundles use
//! `Versions/Current` links on macOS) and path removal.

use crate::error::{Error, ErrorExt, Result};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Path of the main binary inside a framework bundle.
///
/// By convention the binary is named after the bundle:
/// `Sdk.framework` → `Sdk.framework/Sdk`.
pub fn framework_binary(framework: &Path) -> Result<PathBuf> {
    let name = framework
        .file_stem()
        .ok_or_else(|| Error::InvalidFramework(framework.to_path_buf()))?;
    Ok(framework.join(name))
}

/// Makes a symbolic link to a directory.
#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a directory.
#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Preserves symlinks on platforms that support them.
/// Fails if the source path is not a directory or doesn't exist.
pub fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_dir() {
        return Err(Error::GenericError(format!("{from:?} is not a directory")));
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).fs_context("creating copy destination", parent)?;
    }

    for entry in walkdir::WalkDir::new(from) {
        let entry = entry?;
        debug_assert!(entry.path().starts_with(from));
        let rel_path = entry.path().strip_prefix(from)?;
        let dest_path = to.join(rel_path);

        if entry.file_type().is_symlink() {
            let target = fs::read_link(entry.path()).fs_context("reading symlink", entry.path())?;
            if entry.path().is_dir() {
                symlink_dir(&target, &dest_path).fs_context("creating symlink", &dest_path)?;
            } else {
                symlink_file(&target, &dest_path).fs_context("creating symlink", &dest_path)?;
            }
        } else if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path).fs_context("creating directory", &dest_path)?;
        } else {
            fs::copy(entry.path(), &dest_path).fs_context("copying file", entry.path())?;
        }
    }

    Ok(())
}

/// Removes a file, symlink or directory tree.
///
/// A path that does not exist is an error.
pub fn remove_path(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path).fs_context("inspecting path", path)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path).fs_context("removing directory", path)
    } else {
        fs::remove_file(path).fs_context("removing file", path)
    }
}
