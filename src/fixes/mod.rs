//! Project-level repair units.
//!
//! These operate on the project root rather than on a single file: the
//! artifact handed to them only selects the unit, and is returned unchanged.
//! `backup` is the exception and works on the artifact's own path.

pub mod code_hike;
pub mod conflicts;
pub mod dependencies;
pub mod install;
pub mod next_config;
pub mod styles;

pub use code_hike::fix_code_hike;
pub use conflicts::fix_conflicts;
pub use dependencies::{update_dependencies, NEXTRA_PACKAGES};
pub use install::install_dependencies;
pub use next_config::fix_next_config;
pub use styles::{fix_all_styles, fix_tailwind};

use crate::errors::Result;
use crate::io::backup;
use crate::transforms::{Artifact, Transform, TransformContext};
use std::path::Path;

/// Declare a unit that runs `$op(ctx)` for any artifact.
macro_rules! project_fix {
    ($unit:ident, $name:literal, $description:literal, $op:expr) => {
        pub struct $unit;

        impl Transform for $unit {
            fn name(&self) -> &'static str {
                $name
            }

            fn description(&self) -> &'static str {
                $description
            }

            fn matches(&self, _path: &Path) -> bool {
                true
            }

            fn apply(&self, artifact: &Artifact, ctx: &TransformContext<'_>) -> Result<String> {
                $op(ctx)?;
                Ok(artifact.content.clone())
            }
        }
    };
}

project_fix!(
    FixAllStyles,
    "fix-all-styles",
    "Write Tailwind/PostCSS configs, app/globals.css and Tailwind devDependencies",
    fix_all_styles
);
project_fix!(
    FixTailwind,
    "fix-tailwind",
    "Write tailwind.config.js and postcss.config.js",
    fix_tailwind
);
project_fix!(
    FixNextConfig,
    "fix-next-config",
    "Replace the Next.js config with a working Nextra 4 config",
    fix_next_config
);
project_fix!(
    FixConflicts,
    "fix-conflicts",
    "Back up and remove pages/ so it cannot clash with app/",
    fix_conflicts
);
project_fix!(
    FixNextra,
    "fix-nextra",
    "Resolve routing conflicts, fix Tailwind, then install dependencies",
    fix_nextra
);
project_fix!(
    FixCodeHike,
    "fix-code-hike",
    "Set up Code Hike across package.json, next.config, mdx-components and app/",
    fix_code_hike
);
project_fix!(
    UpdateDependencies,
    "update-dependencies",
    "Bump nextra and its themes in package.json",
    update_dependencies
);
project_fix!(
    InstallDependencies,
    "install-dependencies",
    "Install dependencies with the primary, then the fallback, package manager",
    install_dependencies
);

/// `fix-conflicts`, `fix-tailwind`, then install.
pub fn fix_nextra(ctx: &TransformContext<'_>) -> Result<()> {
    fix_conflicts(ctx)?;
    fix_tailwind(ctx)?;
    install_dependencies(ctx)?;
    Ok(())
}

/// Copies the artifact's path to its `.bak` sibling.
pub struct Backup;

impl Transform for Backup {
    fn name(&self) -> &'static str {
        "backup"
    }

    fn description(&self) -> &'static str {
        "Copy a file or directory to <path>.bak"
    }

    fn matches(&self, _path: &Path) -> bool {
        true
    }

    fn apply(&self, artifact: &Artifact, ctx: &TransformContext<'_>) -> Result<String> {
        let saved = backup(ctx.fs, &artifact.path)?;
        ctx.reporter.success(format!(
            "Backed up {} to {}",
            ctx.display_path(&artifact.path),
            ctx.display_path(&saved)
        ));
        Ok(artifact.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::FileSystem;
    use crate::testkit::{MemoryFileSystem, RecordingRunner};
    use crate::transforms::test_support::Harness;

    #[test]
    fn backup_unit_copies_directory() {
        let h = Harness::new(MemoryFileSystem::new().with_file("/site/pages/index.mdx", "# Home"));
        let artifact = h.artifact("pages");
        assert_eq!(Backup.run(&artifact, &h.ctx()).unwrap(), artifact);
        assert_eq!(h.fs.content("/site/pages.bak/index.mdx").unwrap(), "# Home");
    }

    #[test]
    fn backup_unit_fails_on_missing_path() {
        let h = Harness::new(MemoryFileSystem::new());
        let artifact = h.artifact("theme.config.jsx");
        assert!(Backup.run(&artifact, &h.ctx()).unwrap_err().is_fatal());
    }

    #[test]
    fn fix_nextra_runs_all_three_steps() {
        let mut h = Harness::new(
            MemoryFileSystem::new()
                .with_file("/site/package.json", "{}")
                .with_file("/site/pages/index.mdx", "# Home"),
        );
        h.runner = RecordingRunner::new().failing("pnpm");
        let artifact = h.artifact("package.json");

        FixNextra.run(&artifact, &h.ctx()).unwrap();

        assert!(!h.fs.exists(Path::new("/site/pages")));
        assert!(h.fs.exists(Path::new("/site/app/page.tsx")));
        assert!(h.fs.exists(Path::new("/site/tailwind.config.js")));
        assert_eq!(h.runner.calls(), vec!["pnpm install", "npm install"]);
    }
}
