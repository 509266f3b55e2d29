//! Error types for codemod operations.
//!
//! Every failure a transform unit or pipeline stage can produce is a
//! [`MigrateError`]. Errors classify themselves into a [`FailureClass`] so
//! the pipeline can decide between continuing past a stage and aborting the
//! whole run, and so the binary can pick an exit status.
//!
//! # Example
//!
//! ```rust
//! use nextra_codemods::errors::{FailureClass, MigrateError};
//!
//! let err = MigrateError::parse("theme.config.jsx", "unexpected token");
//! assert_eq!(err.class(), FailureClass::Recoverable);
//! assert_eq!(err.exit_code(), 1);
//! ```

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// How a failure affects the surrounding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Bad command line: nothing was attempted.
    InvalidInvocation,
    /// The stage is skipped, the pipeline continues.
    Recoverable,
    /// The pipeline aborts and prints remediation commands.
    Fatal,
}

/// Main error type for codemod operations.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("Transform \"{name}\" not found. Available transforms: {}", .available.join(", "))]
    UnknownTransform {
        name: String,
        available: Vec<String>,
    },

    #[error("Transform \"{0}\" is already registered")]
    DuplicateTransform(String),

    #[error("Missing required argument <{0}>")]
    MissingArgument(&'static str),

    /// File system failure on an artifact the run depends on.
    #[error("Failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Source that could not be parsed or has an unexpected shape.
    #[error("Failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// Malformed package.json.
    #[error("Invalid JSON in {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// An external process for an optional step exited unsuccessfully.
    #[error("Command `{program}` failed: {message}")]
    Command { program: String, message: String },

    /// Both the primary and the fallback installer failed.
    #[error("Dependency installation failed: {}", .attempts.join("; "))]
    InstallFailed { attempts: Vec<String> },
}

impl MigrateError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn manifest(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Manifest {
            path: path.into(),
            source,
        }
    }

    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn command(program: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Command {
            program: program.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a missing input path, reported as an I/O failure.
    pub fn not_found(action: &'static str, path: &Path) -> Self {
        Self::io(
            action,
            path,
            io::Error::new(io::ErrorKind::NotFound, "no such file or directory"),
        )
    }

    /// Classify this error for the pipeline and the process exit status.
    #[must_use]
    pub fn class(&self) -> FailureClass {
        match self {
            Self::UnknownTransform { .. }
            | Self::DuplicateTransform(_)
            | Self::MissingArgument(_) => FailureClass::InvalidInvocation,
            Self::Io { .. } | Self::InstallFailed { .. } => FailureClass::Fatal,
            Self::Parse { .. } | Self::Manifest { .. } | Self::Config { .. } | Self::Command { .. } => {
                FailureClass::Recoverable
            }
        }
    }

    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.class() == FailureClass::Fatal
    }

    /// Get the associated path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. }
            | Self::Parse { path, .. }
            | Self::Manifest { path, .. }
            | Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Exit status when this error ends the process.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub type Result<T> = std::result::Result<T, MigrateError>;
