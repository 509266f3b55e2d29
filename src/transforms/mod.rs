//! Transform units and the registry that names them.
//!
//! A unit inspects one [`Artifact`]. When the artifact's path is not one the
//! unit recognises, [`Transform::run`] hands back an identical copy. When it
//! is, the unit rewrites files through the [`TransformContext`] and returns
//! the content the input path should hold afterwards: the original text for
//! units that only derive new files, rewritten text for the few in-place
//! units (`migrate-meta-files`, `setup-code-hike`).

pub mod code_hike;
pub mod mdx_components;
pub mod meta_files;
pub mod next_config;
pub mod pages_to_app;
pub mod registry;
pub mod setup_search;
pub mod theme_config;

pub use registry::{available_transforms, registry, TransformRegistry};

use crate::config::{CodemodConfig, VersionsConfig};
use crate::errors::Result;
use crate::io::{CommandRunner, FileSystem};
use crate::report::Reporter;
use std::path::{Path, PathBuf};

/// One file's identity and text at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub content: String,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Read `path` from disk. Directories and missing paths have empty content.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let content = if fs.is_file(path) {
            fs.read_to_string(path)?
        } else {
            String::new()
        };
        Ok(Self::new(path, content))
    }

    pub fn file_name(&self) -> &str {
        file_name(&self.path)
    }
}

/// Final path component as UTF-8, or `""`.
pub fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

/// Options shared by every unit in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    pub project_root: PathBuf,
    pub auto_rename: bool,
    pub versions: VersionsConfig,
    pub package_managers: Vec<String>,
}

impl TransformOptions {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self::from_config(project_root, &CodemodConfig::default())
    }

    pub fn from_config(project_root: impl Into<PathBuf>, config: &CodemodConfig) -> Self {
        Self {
            project_root: project_root.into(),
            auto_rename: config.migration.auto_rename,
            versions: config.versions.clone(),
            package_managers: config.install.package_managers.clone(),
        }
    }
}

/// Collaborators a unit may use. Units never reach the outside world any
/// other way.
#[derive(Clone, Copy)]
pub struct TransformContext<'a> {
    pub fs: &'a dyn FileSystem,
    pub runner: &'a dyn CommandRunner,
    pub reporter: &'a Reporter,
    pub options: &'a TransformOptions,
}

impl TransformContext<'_> {
    /// `relative` resolved against the project root.
    pub fn root_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.options.project_root.join(relative)
    }

    /// Path relative to the project root for messages.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.options.project_root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

/// A named, independent migration step.
pub trait Transform: Send + Sync {
    /// Registry key, e.g. `migrate-theme-config`.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Whether this unit applies to `path`. First matching rule wins.
    fn matches(&self, path: &Path) -> bool;

    /// Perform the rewrite for a matching artifact.
    fn apply(&self, artifact: &Artifact, ctx: &TransformContext<'_>) -> Result<String>;

    /// Run against any artifact, passing non-matching ones through untouched.
    fn run(&self, artifact: &Artifact, ctx: &TransformContext<'_>) -> Result<Artifact> {
        if !self.matches(&artifact.path) {
            log::debug!("{} does not apply to {}", self.name(), artifact.path.display());
            return Ok(artifact.clone());
        }
        let content = self.apply(artifact, ctx)?;
        Ok(Artifact {
            path: artifact.path.clone(),
            content,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::testkit::{MemoryFileSystem, RecordingRunner};

    /// Everything a unit test needs to build a [`TransformContext`].
    pub struct Harness {
        pub fs: MemoryFileSystem,
        pub runner: RecordingRunner,
        pub reporter: Reporter,
        pub options: TransformOptions,
    }

    impl Harness {
        pub fn new(fs: MemoryFileSystem) -> Self {
            Self {
                fs,
                runner: RecordingRunner::new(),
                reporter: Reporter::silent(),
                options: TransformOptions::new("/site"),
            }
        }

        pub fn ctx(&self) -> TransformContext<'_> {
            TransformContext {
                fs: &self.fs,
                runner: &self.runner,
                reporter: &self.reporter,
                options: &self.options,
            }
        }

        pub fn artifact(&self, relative: &str) -> Artifact {
            let path = self.options.project_root.join(relative);
            Artifact::load(&self.fs, &path).unwrap()
        }
    }
}
