//! Project shape, detected once at the start of a run.

use crate::io::FileSystem;
use crate::manifest::MANIFEST_FILE;
use crate::transforms::next_config::find_next_config;
use std::path::{Path, PathBuf};

/// Lookup order for the legacy theme configuration.
pub const LEGACY_CONFIG_NAMES: [&str; 3] = ["theme.config.jsx", "theme.config.js", "theme.config.tsx"];

/// Existence checks only; nothing is parsed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectState {
    pub root: PathBuf,
    pub has_manifest: bool,
    pub has_legacy_routing: bool,
    pub has_app_dir: bool,
    /// First legacy theme config found, in lookup order.
    pub legacy_config: Option<PathBuf>,
    /// Existing `next.config.mjs` or `next.config.js`.
    pub next_config: Option<PathBuf>,
}

impl ProjectState {
    pub fn detect(fs: &dyn FileSystem, root: &Path) -> Self {
        let legacy_config = LEGACY_CONFIG_NAMES
            .iter()
            .map(|name| root.join(name))
            .find(|path| fs.is_file(path));

        Self {
            root: root.to_path_buf(),
            has_manifest: fs.is_file(&root.join(MANIFEST_FILE)),
            has_legacy_routing: fs.is_dir(&root.join("pages")),
            has_app_dir: fs.is_dir(&root.join("app")),
            legacy_config,
            next_config: find_next_config(fs, root),
        }
    }

    pub fn has_legacy_config(&self) -> bool {
        self.legacy_config.is_some()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.root.join("pages")
    }

    /// The config the next-config stage rewrites, or the ESM file it creates.
    pub fn next_config_target(&self) -> PathBuf {
        self.next_config
            .clone()
            .unwrap_or_else(|| self.root.join("next.config.mjs"))
    }

    /// Everything the run may mutate that exists right now.
    pub fn backup_targets(&self, fs: &dyn FileSystem) -> Vec<PathBuf> {
        let mut targets = Vec::new();
        if self.has_legacy_routing {
            targets.push(self.pages_dir());
        }
        if self.has_app_dir {
            targets.push(self.root.join("app"));
        }
        targets.extend(self.legacy_config.clone());
        targets.extend(self.next_config.clone());
        targets.push(self.manifest_path());
        for name in ["tailwind.config.js", "postcss.config.js"] {
            let path = self.root.join(name);
            if fs.is_file(&path) {
                targets.push(path);
            }
        }
        targets.retain(|path| fs.exists(path));
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::MemoryFileSystem;
    use pretty_assertions::assert_eq;

    #[test]
    fn detects_v3_project() {
        let fs = MemoryFileSystem::new()
            .with_file("/site/package.json", "{}")
            .with_file("/site/theme.config.tsx", "")
            .with_file("/site/theme.config.jsx", "")
            .with_file("/site/next.config.js", "")
            .with_file("/site/pages/index.mdx", "");
        let state = ProjectState::detect(&fs, Path::new("/site"));

        assert!(state.has_manifest);
        assert!(state.has_legacy_routing);
        assert!(!state.has_app_dir);
        assert_eq!(state.legacy_config, Some(PathBuf::from("/site/theme.config.jsx")));
        assert_eq!(state.next_config_target(), PathBuf::from("/site/next.config.js"));
        assert_eq!(
            state.backup_targets(&fs),
            vec![
                PathBuf::from("/site/pages"),
                PathBuf::from("/site/theme.config.jsx"),
                PathBuf::from("/site/next.config.js"),
                PathBuf::from("/site/package.json"),
            ]
        );
    }

    #[test]
    fn empty_directory_has_nothing() {
        let fs = MemoryFileSystem::new().with_dir("/site");
        let state = ProjectState::detect(&fs, Path::new("/site"));
        assert!(!state.has_manifest);
        assert!(!state.has_legacy_config());
        assert_eq!(state.next_config_target(), PathBuf::from("/site/next.config.mjs"));
        assert!(state.backup_targets(&fs).is_empty());
    }
}
