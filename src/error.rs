//! Error types for XCFramework assembly.
//!
//! Provides the error taxonomy for the build pipeline, operator hints, and
//! filesystem-specific errors with path context.
//!
//! # Features
//!
//! - **ErrorExt trait**: Filesystem operations with automatic path context
//! - **bail! macro**: Early return with formatted error messages
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use xcframework_maker::error::{ErrorExt, Result};
//! use xcframework_maker::bail;
//!
//! fn read_plist(path: &Path) -> Result<String> {
//!     let contents = std::fs::read_to_string(path)
//!         .fs_context("reading Info.plist", path)?;
//!
//!     if contents.is_empty() {
//!         bail!("Info.plist at {} is empty", path.display());
//!     }
//!
//!     Ok(contents)
//! }
//! ```

use std::{
    io,
    path::{self, PathBuf},
};
use thiserror::Error as DeriveError;

/// Errors returned while assembling an XCFramework.
///
/// Collaborator failures are surfaced unchanged to the caller of
/// [`MakeXcframework::build`](crate::MakeXcframework::build); nothing in the
/// pipeline retries or recovers locally.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// No platform framework was supplied.
    ///
    /// Detected before any side effect (no temp directory, no logging).
    #[error("no input framework supplied: pass at least one platform framework")]
    EmptyInput,

    /// A shell command exited with a non-zero status.
    #[error("shell command `{command}` failed ({}):\n{stdout}{stderr}", status_text(.status))]
    ShellCommand {
        /// The command line handed to the shell
        command: String,
        /// Exit code, `None` if terminated by a signal
        status: Option<i32>,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
    },

    /// A wrapped tool (lipo, xcodebuild) exited with a non-zero status.
    #[error("{tool} failed ({}) running `{command}`: {stderr}", status_text(.status))]
    ToolFailed {
        /// Tool name
        tool: &'static str,
        /// Rendered command line
        command: String,
        /// Exit code, `None` if terminated by a signal
        status: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// A required program could not be located.
    #[error("{tool} not found: install it or set {env_var} to its path")]
    ToolNotFound {
        /// Program name
        tool: &'static str,
        /// Environment variable that overrides the lookup
        env_var: &'static str,
    },

    /// Child process could not be spawned.
    #[error("failed to run command {command}: {error}")]
    CommandFailed {
        /// Command that failed to execute
        command: String,
        /// The underlying error
        error: io::Error,
    },

    /// Architecture reported by a tool is outside the supported set.
    #[error("unsupported architecture: {0}")]
    UnsupportedArch(String),

    /// Framework bundle path has no base name to derive its binary from.
    #[error("invalid framework bundle path: {}", .0.display())]
    InvalidFramework(PathBuf),

    /// A narrowing copy was asked to keep no architectures at all.
    #[error("no architectures selected for {}", .framework.display())]
    EmptyArchSelection {
        /// Framework that was being copied
        framework: PathBuf,
    },

    /// File system error with path context.
    ///
    /// Created by the [`ErrorExt`] trait's `fs_context` method.
    #[error("{context} {path}: {error}")]
    Fs {
        /// Context describing the operation (e.g., "copying framework")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// Generic I/O error.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Error walking a framework bundle.
    #[error("{0}")]
    WalkdirError(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error("{0}")]
    StripError(#[from] path::StripPrefixError),

    /// Generic error with custom message.
    #[error("{0}")]
    GenericError(String),
}

fn status_text(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl Error {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            Error::EmptyInput => vec![
                "Supply at least one of the iOS or tvOS framework paths".to_string(),
            ],
            Error::ToolNotFound { tool, env_var } => vec![
                "Install the Xcode Command Line Tools: xcode-select --install".to_string(),
                format!("Or point {env_var} at an existing {tool} executable"),
            ],
            Error::ToolFailed { tool: "lipo", .. } => vec![
                "Inspect the framework binary with: lipo -info <binary>".to_string(),
                "Verify the framework was built for the expected architectures".to_string(),
            ],
            Error::ShellCommand { .. } => vec![
                "Re-run the failing command by hand to inspect its output".to_string(),
                "Verify the arm64 slice is a static archive of object files".to_string(),
            ],
            Error::UnsupportedArch(arch) => vec![format!(
                "Rebuild the framework without the {arch} slice; supported: i386, x86_64, armv7, arm64"
            )],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}

/// Convenient type alias for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for filesystem operations with automatic path context.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading file", "creating directory", "copying framework".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Macro for early return with error.
///
/// Converts the message into a [`Error::GenericError`] and returns immediately.
///
/// ```ignore
/// bail!("operation failed");
/// bail!("invalid value: {}", value);
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::error::Error::GenericError(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::error::Error::GenericError($err.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::GenericError(format!($fmt, $($arg)*)))
    };
}
