//! Framework version bumps in `package.json`.

use crate::errors::Result;
use crate::manifest::{DependencyChange, Manifest, MANIFEST_FILE};
use crate::transforms::TransformContext;

pub const NEXTRA_PACKAGES: [&str; 3] = ["nextra", "nextra-theme-docs", "nextra-theme-blog"];

/// Bump every declared Nextra package to the configured target. Packages the
/// manifest does not declare are not added. Returns the packages changed.
pub fn update_dependencies(ctx: &TransformContext<'_>) -> Result<Vec<String>> {
    let target = ctx.options.versions.nextra.as_str();
    let mut manifest = Manifest::load(ctx.fs, &ctx.root_path(MANIFEST_FILE))?;

    let mut bumped = Vec::new();
    for package in NEXTRA_PACKAGES {
        match manifest.bump_if_present(package, target) {
            DependencyChange::Bumped { from } => {
                ctx.reporter
                    .success(format!("Updated {} from {} to {}", package, from, target));
                bumped.push(package.to_string());
            }
            DependencyChange::Added | DependencyChange::Unchanged => {
                log::debug!("{} left unchanged", package);
            }
        }
    }

    if bumped.is_empty() {
        ctx.reporter.info("Nextra dependencies are already up to date");
    } else {
        manifest.save(ctx.fs)?;
    }
    Ok(bumped)
}
