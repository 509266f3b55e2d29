//! `.bak` copies taken before a destructive operation.
//!
//! A file `theme.config.jsx` is copied to `theme.config.jsx.bak`; a directory
//! `pages/` is mirrored file by file into `pages.bak/`. An existing backup is
//! overwritten entry by entry, so only one backup generation is ever kept.

use crate::errors::{MigrateError, Result};
use crate::io::traits::FileSystem;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Sibling path that holds the backup of `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".bak");
    path.with_file_name(name)
}

/// Copy `path` to its `.bak` sibling and return the backup location.
///
/// # Errors
///
/// Fails when `path` does not exist or any copy fails. Callers check
/// existence first when a missing source is acceptable.
pub fn backup(fs: &dyn FileSystem, path: &Path) -> Result<PathBuf> {
    let target = backup_path(path);

    if fs.is_file(path) {
        fs.copy_file(path, &target)?;
    } else if fs.is_dir(path) {
        mirror_dir(fs, path, &target)?;
    } else {
        return Err(MigrateError::not_found("back up", path));
    }

    log::info!("Backed up {} to {}", path.display(), target.display());
    Ok(target)
}

fn mirror_dir(fs: &dyn FileSystem, source: &Path, target: &Path) -> Result<()> {
    fs.create_dir_all(target)?;
    for file in fs.list_files(source)? {
        let Ok(relative) = file.strip_prefix(source) else {
            continue;
        };
        let destination = target.join(relative);
        if let Some(parent) = destination.parent() {
            fs.create_dir_all(parent)?;
        }
        fs.copy_file(&file, &destination)?;
    }
    Ok(())
}
