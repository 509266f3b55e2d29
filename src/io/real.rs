//! Production implementations of I/O traits.
//!
//! These implementations perform actual file system, process and terminal
//! operations. For testing, use the doubles in [`crate::testkit`] instead.
//!
//! ```rust,ignore
//! use nextra_codemods::io::{FileSystem, RealFileSystem};
//!
//! let fs = RealFileSystem::new();
//! let manifest = fs.read_to_string(Path::new("package.json"))?;
//! ```

use crate::errors::{MigrateError, Result};
use crate::io::traits::{CommandOutput, CommandRunner, FileSystem, Prompter};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

/// Production file system implementation.
///
/// This implementation directly delegates to `std::fs` operations.
#[derive(Debug, Default, Clone)]
pub struct RealFileSystem;

impl RealFileSystem {
    /// Create a new real file system instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| MigrateError::io("read", path, e))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content).map_err(|e| MigrateError::io("write", path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| MigrateError::io("create directory", path, e))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| MigrateError::io("copy", from, e))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path).map_err(|e| MigrateError::io("remove", path, e))
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("filesystem loop"));
                MigrateError::io("walk", path, source)
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

/// Runs programs found on `PATH`, capturing stdout and stderr.
#[derive(Debug, Default, Clone)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput> {
        let resolved = which::which(program)
            .map_err(|e| MigrateError::command(program, format!("not found on PATH ({})", e)))?;

        log::debug!("Running {} {} in {}", resolved.display(), args.join(" "), cwd.display());

        let output = Command::new(&resolved)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|e| MigrateError::command(program, e.to_string()))?;

        Ok(CommandOutput {
            success: output.status.success(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Reads answers from the controlling terminal.
#[derive(Debug, Default, Clone)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, question: &str) -> bool {
        print!("{} (y/n) ", question);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_affirmative(&answer),
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
