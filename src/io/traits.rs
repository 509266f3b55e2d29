//! I/O trait definitions for codemod operations.
//!
//! Transform units and pipeline stages never touch `std::fs`, the terminal or
//! child processes directly. They go through these traits, carried in a
//! [`TransformContext`](crate::transforms::TransformContext), so the same
//! code runs against the real project or an in-memory test double.
//!
//! # Example
//!
//! ```rust,ignore
//! use nextra_codemods::io::FileSystem;
//!
//! fn has_pages<F: FileSystem + ?Sized>(fs: &F, root: &Path) -> bool {
//!     fs.is_dir(&root.join("pages"))
//! }
//! ```

use crate::errors::Result;
use std::path::{Path, PathBuf};

/// File system operations trait.
///
/// Implementations should be thread-safe (`Send + Sync`) even though the
/// pipeline itself is strictly sequential.
pub trait FileSystem: Send + Sync {
    /// Read a file's contents as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns `MigrateError::Io` if the file doesn't exist, permission is
    /// denied, or the file isn't valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write content to a file, creating it if it doesn't exist.
    ///
    /// The parent directory must already exist.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Check if a path exists (file or directory).
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Check if a path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Copy a single file, overwriting `to` if present.
    fn copy_file(&self, from: &Path, to: &Path) -> Result<()>;

    /// Remove a directory and everything below it.
    fn remove_dir_all(&self, path: &Path) -> Result<()>;

    /// All regular files below `dir`, recursively, in sorted order.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Write a file, creating missing parent directories first.
    fn write_with_parents(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.create_dir_all(parent)?;
        }
        self.write(path, content)
    }

    /// Write only when the file does not exist yet. Returns whether it wrote.
    fn write_if_absent(&self, path: &Path, content: &str) -> Result<bool> {
        if self.exists(path) {
            return Ok(false);
        }
        self.write_with_parents(path, content)?;
        Ok(true)
    }
}

/// Captured result of an external process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub stderr: String,
}

/// Runs external programs to completion, capturing their output.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` in `cwd` and wait for it to exit.
    ///
    /// # Errors
    ///
    /// Returns `MigrateError::Command` when the program cannot be started at
    /// all. A program that starts and exits non-zero is reported through
    /// [`CommandOutput::success`] instead.
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput>;
}

/// Yes/no questions asked of the user.
pub trait Prompter {
    fn confirm(&self, question: &str) -> bool;
}

/// Answers every question affirmatively (`--yes`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Prompter for AssumeYes {
    fn confirm(&self, question: &str) -> bool {
        log::debug!("Assuming yes for: {}", question);
        true
    }
}
