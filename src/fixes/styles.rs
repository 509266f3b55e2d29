//! Tailwind and PostCSS setup required by the Nextra 4 themes.

use crate::errors::Result;
use crate::manifest::{Manifest, Section, MANIFEST_FILE};
use crate::templates::{GLOBALS_CSS, POSTCSS_CONFIG, TAILWIND_CONFIG};
use crate::transforms::TransformContext;

/// Added to devDependencies only when no section declares them.
pub const TAILWIND_DEV_DEPENDENCIES: [(&str, &str); 3] = [
    ("tailwindcss", "^3.3.0"),
    ("postcss", "^8.4.31"),
    ("autoprefixer", "^10.4.16"),
];

/// Overwrite `tailwind.config.js` and `postcss.config.js`.
pub fn fix_tailwind(ctx: &TransformContext<'_>) -> Result<()> {
    for (name, content) in [
        ("tailwind.config.js", TAILWIND_CONFIG),
        ("postcss.config.js", POSTCSS_CONFIG),
    ] {
        let path = ctx.root_path(name);
        ctx.fs.write(&path, content)?;
        ctx.reporter.success(format!("Wrote {}", name));
    }
    Ok(())
}

/// Configs, `app/globals.css` when `app/` exists, and the Tailwind toolchain.
pub fn fix_all_styles(ctx: &TransformContext<'_>) -> Result<()> {
    fix_tailwind(ctx)?;

    let app = ctx.root_path("app");
    if ctx.fs.is_dir(&app) {
        ctx.fs.write(&app.join("globals.css"), GLOBALS_CSS)?;
        ctx.reporter.success("Wrote app/globals.css");
    } else {
        log::info!("No app/ directory; skipping globals.css");
    }

    let manifest_path = ctx.root_path(MANIFEST_FILE);
    if !ctx.fs.is_file(&manifest_path) {
        ctx.reporter
            .warn("No package.json found; add tailwindcss, postcss and autoprefixer yourself");
        return Ok(());
    }

    let mut manifest = Manifest::load(ctx.fs, &manifest_path)?;
    let added: Vec<&str> = TAILWIND_DEV_DEPENDENCIES
        .iter()
        .filter(|(name, version)| manifest.add_if_absent(Section::DevDependencies, name, version))
        .map(|(name, _)| *name)
        .collect();
    if !added.is_empty() {
        manifest.save(ctx.fs)?;
        ctx.reporter
            .success(format!("Added {} to devDependencies", added.join(", ")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::MemoryFileSystem;
    use crate::transforms::test_support::Harness;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    #[test]
    fn configs_are_overwritten() {
        let h = Harness::new(
            MemoryFileSystem::new()
                .with_dir("/site")
                .with_file("/site/tailwind.config.js", "module.exports = {}"),
        );
        fix_tailwind(&h.ctx()).unwrap();
        assert_eq!(h.fs.content("/site/tailwind.config.js").unwrap(), TAILWIND_CONFIG);
        assert_eq!(h.fs.content("/site/postcss.config.js").unwrap(), POSTCSS_CONFIG);
    }

    #[test]
    fn existing_dev_dependencies_are_kept() {
        let h = Harness::new(
            MemoryFileSystem::new()
                .with_dir("/site/app")
                .with_file("/site/package.json", r#"{"devDependencies":{"tailwindcss":"^3.4.1"}}"#),
        );
        fix_all_styles(&h.ctx()).unwrap();

        let manifest =
            Manifest::parse(Path::new("package.json"), &h.fs.content("/site/package.json").unwrap())
                .unwrap();
        assert_eq!(manifest.dependency_version("tailwindcss"), Some("^3.4.1"));
        assert_eq!(manifest.dependency_version("postcss"), Some("^8.4.31"));
        assert_eq!(manifest.dependency_version("autoprefixer"), Some("^10.4.16"));
        assert_eq!(h.fs.content("/site/app/globals.css").unwrap(), GLOBALS_CSS);
    }

    #[test]
    fn globals_css_needs_app_directory() {
        let h = Harness::new(MemoryFileSystem::new().with_dir("/site"));
        fix_all_styles(&h.ctx()).unwrap();
        assert!(h.fs.content("/site/app/globals.css").is_none());
        assert!(h.reporter.contains("No package.json found"));
    }
}
