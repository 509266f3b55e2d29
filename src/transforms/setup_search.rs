//! Pagefind search indexing for the Nextra 4 search component.

use super::next_config::find_next_config;
use super::{file_name, Artifact, Transform, TransformContext};
use crate::errors::Result;
use crate::io::FileSystem;
use crate::manifest::{DependencyChange, Manifest, Section, MANIFEST_FILE};
use crate::templates::{NPMRC_PRE_POST_SCRIPTS, PAGEFIND_IGNORE};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

pub const PAGEFIND: &str = "pagefind";
pub const POSTBUILD: &str = "postbuild";
pub const STATIC_EXPORT_SCRIPT: &str = "pagefind --site .next/server/app --output-path out/_pagefind";
pub const SERVER_SCRIPT: &str = "pagefind --site .next/server/app --output-path public/_pagefind";
pub const PNPM_LOCKFILE: &str = "pnpm-lock.yaml";

static STATIC_EXPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"output\s*:\s*(?:'export'|"export")"#).unwrap());

/// Whether a Next config sets `output: 'export'` (either quote style).
pub fn is_static_export(next_config: &str) -> bool {
    STATIC_EXPORT.is_match(next_config)
}

pub fn postbuild_script(static_export: bool) -> &'static str {
    if static_export {
        STATIC_EXPORT_SCRIPT
    } else {
        SERVER_SCRIPT
    }
}

/// Append `block` to the file at `path` unless it already mentions `marker`.
/// Missing files are created. Returns whether anything was written.
pub fn append_once(fs: &dyn FileSystem, path: &Path, marker: &str, block: &str) -> Result<bool> {
    let existing = if fs.is_file(path) {
        fs.read_to_string(path)?
    } else {
        String::new()
    };
    if existing.contains(marker) {
        return Ok(false);
    }

    let mut updated = existing;
    if !updated.is_empty() {
        if !updated.ends_with('\n') {
            updated.push('\n');
        }
        updated.push('\n');
    }
    updated.push_str(block);
    fs.write_with_parents(path, &updated)?;
    Ok(true)
}

/// Configure Pagefind for the project whose manifest is at `manifest_path`.
pub fn setup_search(ctx: &TransformContext<'_>, manifest_path: &Path) -> Result<()> {
    let fs = ctx.fs;
    let mut manifest = Manifest::load(fs, manifest_path)?;
    let dependency =
        manifest.ensure_dependency(Section::DevDependencies, PAGEFIND, &ctx.options.versions.pagefind);
    let mut changed = dependency.is_change();
    match dependency {
        DependencyChange::Added => ctx.reporter.success(format!(
            "Added {}@{} to devDependencies",
            PAGEFIND, ctx.options.versions.pagefind
        )),
        DependencyChange::Bumped { from } => ctx.reporter.success(format!(
            "Updated {} from {} to {}",
            PAGEFIND, from, ctx.options.versions.pagefind
        )),
        DependencyChange::Unchanged => log::info!("{} is already up to date", PAGEFIND),
    }

    let static_export = find_next_config(fs, &ctx.options.project_root)
        .and_then(|path| fs.read_to_string(&path).ok())
        .is_some_and(|source| is_static_export(&source));
    let script = postbuild_script(static_export);

    match manifest.script(POSTBUILD) {
        Some(current) if current == script => {}
        Some(current) if !current.contains(PAGEFIND) => ctx.reporter.warn(format!(
            "Existing \"{}\" script left unchanged; add `{}` to it to build the search index",
            POSTBUILD, script
        )),
        _ => {
            manifest.set_script(POSTBUILD, script);
            ctx.reporter
                .success(format!("Set \"{}\" script to `{}`", POSTBUILD, script));
            changed = true;
        }
    }

    if changed {
        manifest.save(fs)?;
    }

    if append_once(fs, &ctx.root_path(".gitignore"), "_pagefind", PAGEFIND_IGNORE)? {
        ctx.reporter.success("Added _pagefind/ to .gitignore");
    }

    if fs.exists(&ctx.root_path(PNPM_LOCKFILE)) {
        let npmrc = ctx.root_path(".npmrc");
        if append_once(fs, &npmrc, NPMRC_PRE_POST_SCRIPTS, &format!("{}\n", NPMRC_PRE_POST_SCRIPTS))? {
            ctx.reporter
                .success("Enabled pre/post scripts for pnpm in .npmrc");
        }
    }

    Ok(())
}

pub struct SetupSearch;

impl Transform for SetupSearch {
    fn name(&self) -> &'static str {
        "setup-search"
    }

    fn description(&self) -> &'static str {
        "Add Pagefind and a postbuild indexing script"
    }

    fn matches(&self, path: &Path) -> bool {
        file_name(path) == MANIFEST_FILE
    }

    fn apply(&self, artifact: &Artifact, ctx: &TransformContext<'_>) -> Result<String> {
        setup_search(ctx, &artifact.path)?;
        Ok(artifact.content.clone())
    }
}
