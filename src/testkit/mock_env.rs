//! In-memory file system for fast, isolated tests.
//!
//! The internal state uses `Arc<RwLock<_>>` so clones share one tree: a test
//! can hand a clone to the code under test and inspect the original after.

use crate::errors::{MigrateError, Result};
use crate::io::traits::FileSystem;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

#[derive(Clone, Default)]
pub struct MemoryFileSystem {
    files: Arc<RwLock<BTreeMap<PathBuf, String>>>,
    dirs: Arc<RwLock<BTreeSet<PathBuf>>>,
    read_only: Arc<RwLock<BTreeSet<PathBuf>>>,
    undecodable: Arc<RwLock<BTreeSet<PathBuf>>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, registering its parent directories.
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        self.register_parents(&path);
        self.files
            .write()
            .expect("Lock poisoned")
            .insert(path, content.into());
        self
    }

    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.register_parents(&path);
        self.dirs.write().expect("Lock poisoned").insert(path);
        self
    }

    /// Make every write at or below `path` fail with `PermissionDenied`.
    pub fn with_read_only(self, path: impl Into<PathBuf>) -> Self {
        self.read_only
            .write()
            .expect("Lock poisoned")
            .insert(path.into());
        self
    }

    /// Add a file whose reads fail with `InvalidData`, like non-UTF-8 bytes
    /// on disk.
    pub fn with_undecodable_file(self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.undecodable
            .write()
            .expect("Lock poisoned")
            .insert(path.clone());
        self.with_file(path, "")
    }

    /// Snapshot of all file paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files
            .read()
            .expect("Lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Content of a file, or `None` when absent.
    pub fn content(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .read()
            .expect("Lock poisoned")
            .get(path.as_ref())
            .cloned()
    }

    fn register_parents(&self, path: &Path) {
        let mut dirs = self.dirs.write().expect("Lock poisoned");
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }

    fn check_writable(&self, action: &'static str, path: &Path) -> Result<()> {
        let read_only = self.read_only.read().expect("Lock poisoned");
        if read_only.iter().any(|ro| path.starts_with(ro)) {
            return Err(MigrateError::io(
                action,
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, "read-only file system"),
            ));
        }
        Ok(())
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        if self.undecodable.read().expect("Lock poisoned").contains(path) {
            return Err(MigrateError::io(
                "read",
                path,
                io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"),
            ));
        }
        self.content(path)
            .ok_or_else(|| MigrateError::not_found("read", path))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.check_writable("write", path)?;
        self.register_parents(path);
        self.files
            .write()
            .expect("Lock poisoned")
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.read().expect("Lock poisoned").contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.read().expect("Lock poisoned").contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.check_writable("create directory", path)?;
        self.register_parents(path);
        self.dirs
            .write()
            .expect("Lock poisoned")
            .insert(path.to_path_buf());
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        let content = self.read_to_string(from)?;
        self.check_writable("copy", to)?;
        self.write(to, &content)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        if !self.is_dir(path) {
            return Err(MigrateError::not_found("remove", path));
        }
        self.check_writable("remove", path)?;
        self.files
            .write()
            .expect("Lock poisoned")
            .retain(|p, _| !p.starts_with(path));
        self.dirs
            .write()
            .expect("Lock poisoned")
            .retain(|p| !p.starts_with(path));
        Ok(())
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !self.is_dir(dir) {
            return Err(MigrateError::not_found("walk", dir));
        }
        Ok(self
            .files
            .read()
            .expect("Lock poisoned")
            .keys()
            .filter(|p| p.starts_with(dir))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_register_parent_directories() {
        let fs = MemoryFileSystem::new().with_file("/p/pages/docs/a.mdx", "a");
        assert!(fs.is_dir(Path::new("/p/pages")));
        assert!(fs.is_dir(Path::new("/p/pages/docs")));
        assert!(fs.exists(Path::new("/p/pages/docs/a.mdx")));
        assert!(!fs.is_dir(Path::new("/p/pages/docs/a.mdx")));
    }

    #[test]
    fn remove_dir_all_drops_subtree_only() {
        let fs = MemoryFileSystem::new()
            .with_file("/p/pages/a.mdx", "a")
            .with_file("/p/pages.bak/a.mdx", "a");
        fs.remove_dir_all(Path::new("/p/pages")).unwrap();

        assert!(!fs.exists(Path::new("/p/pages")));
        assert!(fs.exists(Path::new("/p/pages.bak/a.mdx")));
    }

    #[test]
    fn read_only_paths_reject_writes() {
        let fs = MemoryFileSystem::new().with_read_only("/p/app");
        let err = fs.write(Path::new("/p/app/page.mdx"), "x").unwrap_err();
        assert!(err.is_fatal());
        assert!(fs.write(Path::new("/p/other.txt"), "x").is_ok());
    }

    #[test]
    fn undecodable_files_exist_but_fail_to_read() {
        let fs = MemoryFileSystem::new().with_undecodable_file("/p/pages/bad.mdx");
        assert!(fs.is_file(Path::new("/p/pages/bad.mdx")));
        assert!(fs.read_to_string(Path::new("/p/pages/bad.mdx")).is_err());
    }
}
