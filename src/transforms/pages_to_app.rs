//! `pages/` → `app/` routing migration.
//!
//! `<dir>/index.<ext>` becomes `app/<dir>/page.<ext>`; any other
//! `<dir>/<name>.<ext>` becomes `app/<dir>/<name>/page.<ext>`. Page text is
//! copied with two light rewrites; `_meta.*` descriptors are migrated and
//! placed beside the pages they describe.

use super::meta_files::{is_meta_file, migrate_meta_source};
use super::{Artifact, Transform, TransformContext};
use crate::errors::{MigrateError, Result};
use crate::io::{backup, backup_path};
use crate::manifest::{Manifest, MANIFEST_FILE};
use crate::templates::{self, LayoutFields};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Component, Path, PathBuf};

pub const PAGES_DIR: &str = "pages";
pub const APP_DIR: &str = "app";

static ROUTER_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(import\s*\{[^}]*\buseRouter\b[^}]*\}\s*from\s*)(['"])next/router(['"])"#)
        .unwrap()
});
static METADATA_EXPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^export\s+(const|let|var|async\s+function|function)\s+(metadata|generateMetadata)\b").unwrap());
static FIRST_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#[ \t]+(.+?)[ \t]*$").unwrap());

/// Where a page at `relative` (inside `pages/`) lands inside `app/`.
/// `None` for files that are not Markdown or MDX pages.
pub fn app_route_for(relative: &Path) -> Option<PathBuf> {
    let ext = relative.extension()?.to_str()?;
    if ext != "md" && ext != "mdx" {
        return None;
    }
    let stem = relative.file_stem()?.to_str()?;
    let parent = relative.parent().unwrap_or_else(|| Path::new(""));
    let page = format!("page.{}", ext);
    if stem == "index" {
        Some(parent.join(page))
    } else {
        Some(parent.join(stem).join(page))
    }
}

/// Apply the page-level rewrites to one page's text.
pub fn rewrite_page(content: &str, relative: &Path) -> String {
    let content = ROUTER_IMPORT
        .replace_all(content, "${1}${2}next/navigation${3}")
        .into_owned();

    let is_mdx = relative.extension().is_some_and(|ext| ext == "mdx");
    if !is_mdx || has_front_matter(&content) || METADATA_EXPORT.is_match(&content) {
        return content;
    }

    let block = templates::page_metadata(&page_title(&content, relative));
    insert_after_imports(&content, &block)
}

fn has_front_matter(content: &str) -> bool {
    content.starts_with("---\n") || content.starts_with("---\r\n")
}

fn page_title(content: &str, relative: &Path) -> String {
    if let Some(caps) = FIRST_HEADING.captures(content) {
        return caps[1].to_string();
    }
    let stem = relative
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("index");
    let name = if stem == "index" {
        relative
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("Home")
    } else {
        stem
    };
    humanize(name)
}

fn humanize(name: &str) -> String {
    name.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Insert `block` after the last top-level import line, or at the top.
fn insert_after_imports(content: &str, block: &str) -> String {
    let mut offset = 0;
    let mut insert_at = None;
    for line in content.split_inclusive('\n') {
        offset += line.len();
        if line.starts_with("import ") {
            insert_at = Some(offset);
        }
    }

    match insert_at {
        Some(at) => {
            let (head, tail) = content.split_at(at);
            let separator = if head.ends_with('\n') { "" } else { "\n" };
            format!("{}{}\n{}\n{}", head, separator, block, tail.trim_start_matches('\n'))
        }
        None => format!("{}\n{}", block, content),
    }
}

/// The `pages` directory `path` lies in (or is).
pub fn pages_root(path: &Path) -> Option<PathBuf> {
    let components: Vec<Component<'_>> = path.components().collect();
    let last = components
        .iter()
        .rposition(|c| matches!(c, Component::Normal(name) if *name == PAGES_DIR))?;
    Some(components[..=last].iter().collect())
}

/// What a routing migration produced, relative to `app/`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RoutingSummary {
    pub pages: Vec<PathBuf>,
    pub meta_files: Vec<PathBuf>,
}

/// Migrate every page under `pages_dir` into `<root>/app`.
pub fn migrate_pages(ctx: &TransformContext<'_>, pages_dir: &Path) -> Result<RoutingSummary> {
    let fs = ctx.fs;
    if !fs.is_dir(pages_dir) {
        return Err(MigrateError::not_found("migrate", pages_dir));
    }

    let source = if ctx.options.auto_rename {
        move_aside(ctx, pages_dir)?
    } else {
        pages_dir.to_path_buf()
    };

    let app_dir = ctx.root_path(APP_DIR);
    fs.create_dir_all(&app_dir)?;

    let mut summary = RoutingSummary::default();
    for file in fs.list_files(&source)? {
        let Ok(relative) = file.strip_prefix(&source) else {
            continue;
        };

        let is_page = app_route_for(relative);
        if is_page.is_none() && !is_meta_file(relative) {
            log::debug!("Skipping {} (not a content page)", file.display());
            continue;
        }
        let content = match fs.read_to_string(&file) {
            Ok(content) => content,
            Err(e) => {
                ctx.reporter
                    .warn(format!("{}; skipped, move it to {}/ by hand", e, APP_DIR));
                continue;
            }
        };

        if let Some(route) = is_page {
            fs.write_with_parents(&app_dir.join(&route), &rewrite_page(&content, relative))?;
            log::info!("Migrated {} to {}", file.display(), route.display());
            summary.pages.push(route);
        } else {
            let migrated = migrate_meta_source(&content, &file).unwrap_or_else(|e| {
                ctx.reporter
                    .warn(format!("{}; copied without changes", e));
                content.clone()
            });
            fs.write_with_parents(&app_dir.join(relative), &migrated)?;
            summary.meta_files.push(relative.to_path_buf());
        }
    }

    scaffold_app(ctx, &app_dir)?;

    ctx.reporter.success(format!(
        "Migrated {} pages and {} _meta files to {}/",
        summary.pages.len(),
        summary.meta_files.len(),
        APP_DIR
    ));

    if !ctx.options.auto_rename {
        ctx.reporter.warn(
            "pages/ and app/ cannot coexist: remove or rename pages/ (`rm -rf pages` or `mv pages pages.bak`), or re-run with --auto-rename",
        );
    }

    warn_if_tailwind_missing(ctx);
    Ok(summary)
}

/// Back up `pages/` to `pages.bak/` (replacing any older backup) and delete it.
fn move_aside(ctx: &TransformContext<'_>, pages_dir: &Path) -> Result<PathBuf> {
    let stale = backup_path(pages_dir);
    if ctx.fs.exists(&stale) {
        ctx.fs.remove_dir_all(&stale)?;
    }
    let moved = backup(ctx.fs, pages_dir)?;
    ctx.fs.remove_dir_all(pages_dir)?;
    ctx.reporter.info(format!(
        "Moved {} to {}",
        ctx.display_path(pages_dir),
        ctx.display_path(&moved)
    ));
    Ok(moved)
}

fn scaffold_app(ctx: &TransformContext<'_>, app_dir: &Path) -> Result<()> {
    let scaffolds = [
        (
            app_dir.join("layout.jsx"),
            templates::layout(&LayoutFields::default()),
        ),
        (app_dir.join("globals.css"), templates::GLOBALS_CSS_BASE.to_string()),
        (ctx.root_path("tailwind.config.js"), templates::TAILWIND_CONFIG.to_string()),
    ];
    for (path, content) in scaffolds {
        if ctx.fs.write_if_absent(&path, &content)? {
            ctx.reporter.success(format!("Created {}", ctx.display_path(&path)));
        }
    }

    let has_root_meta = ["_meta.js", "_meta.jsx", "_meta.ts", "_meta.tsx"]
        .iter()
        .any(|name| ctx.fs.exists(&app_dir.join(name)));
    if !has_root_meta {
        let meta = app_dir.join("_meta.js");
        ctx.fs.write(&meta, templates::APP_META)?;
        ctx.reporter.success(format!("Created {}", ctx.display_path(&meta)));
    }
    Ok(())
}

fn warn_if_tailwind_missing(ctx: &TransformContext<'_>) {
    match Manifest::load(ctx.fs, &ctx.root_path(MANIFEST_FILE)) {
        Ok(manifest) if !manifest.has_dependency("tailwindcss") => ctx.reporter.warn(
            "tailwindcss is required by Nextra 4 but is not a dependency: npm install -D tailwindcss postcss autoprefixer",
        ),
        Ok(_) => {}
        Err(e) => log::debug!("Skipping tailwindcss check: {}", e),
    }
}

pub struct MigratePagesToApp;

impl Transform for MigratePagesToApp {
    fn name(&self) -> &'static str {
        "migrate-pages-to-app"
    }

    fn description(&self) -> &'static str {
        "Move pages/ content into the app/ directory layout"
    }

    fn matches(&self, path: &Path) -> bool {
        pages_root(path).is_some()
    }

    fn apply(&self, artifact: &Artifact, ctx: &TransformContext<'_>) -> Result<String> {
        let pages_dir = pages_root(&artifact.path)
            .ok_or_else(|| MigrateError::not_found("migrate", &artifact.path))?;
        migrate_pages(ctx, &pages_dir)?;
        Ok(artifact.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::FileSystem;
    use crate::testkit::MemoryFileSystem;
    use crate::transforms::test_support::Harness;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn index_maps_to_page_and_others_to_subdirectories() {
        assert_eq!(app_route_for(Path::new("index.mdx")), Some(PathBuf::from("page.mdx")));
        assert_eq!(
            app_route_for(Path::new("docs/guide.mdx")),
            Some(PathBuf::from("docs/guide/page.mdx"))
        );
        assert_eq!(
            app_route_for(Path::new("docs/index.md")),
            Some(PathBuf::from("docs/page.md"))
        );
        assert_eq!(app_route_for(Path::new("_app.jsx")), None);
        assert_eq!(app_route_for(Path::new("_meta.js")), None);
    }

    #[test]
    fn pages_root_finds_enclosing_directory() {
        assert_eq!(pages_root(Path::new("/site/pages")), Some(PathBuf::from("/site/pages")));
        assert_eq!(
            pages_root(Path::new("./pages/docs/a.mdx")),
            Some(PathBuf::from("./pages"))
        );
        assert_eq!(pages_root(Path::new("/site/pages.bak")), None);
        assert_eq!(pages_root(Path::new("/site/app")), None);
    }

    #[test]
    fn rewrites_router_import_and_inserts_metadata() {
        let page = indoc! {"
            import { Callout } from 'nextra/components'
            import { useRouter } from 'next/router'

            # Getting Started

            <Callout>Hi</Callout>
        "};
        assert_eq!(
            rewrite_page(page, Path::new("docs/getting-started.mdx")),
            indoc! {"
                import { Callout } from 'nextra/components'
                import { useRouter } from 'next/navigation'

                export const metadata = {
                  title: 'Getting Started'
                }

                # Getting Started

                <Callout>Hi</Callout>
            "}
        );
    }

    #[test]
    fn metadata_title_falls_back_to_file_name() {
        let out = rewrite_page("Some text\n", Path::new("docs/api-reference.mdx"));
        assert!(out.starts_with("export const metadata = {\n  title: 'Api Reference'\n}\n"));
    }

    #[test]
    fn front_matter_and_existing_metadata_are_left_alone() {
        let with_front_matter = "---\ntitle: Home\n---\n\n# Home\n";
        assert_eq!(rewrite_page(with_front_matter, Path::new("index.mdx")), with_front_matter);

        let with_export = "export const metadata = { title: 'X' }\n\n# X\n";
        assert_eq!(rewrite_page(with_export, Path::new("x.mdx")), with_export);

        let markdown = "# Plain\n";
        assert_eq!(rewrite_page(markdown, Path::new("plain.md")), markdown);
    }

    fn site() -> MemoryFileSystem {
        MemoryFileSystem::new()
            .with_file("/site/package.json", r#"{"dependencies":{"nextra":"^3.0.0"}}"#)
            .with_file("/site/pages/index.mdx", "---\ntitle: Home\n---\n# Home\n")
            .with_file("/site/pages/docs/guide.mdx", "---\ntitle: Guide\n---\n# Guide\n")
            .with_file("/site/pages/_meta.js", "export default { index: 'Home', docs: 'Docs' }\n")
            .with_file("/site/pages/_app.jsx", "export default function App() {}")
    }

    #[test]
    fn migrates_tree_and_scaffolds_app() {
        let h = Harness::new(site());
        let summary = migrate_pages(&h.ctx(), Path::new("/site/pages")).unwrap();

        assert_eq!(
            summary.pages,
            vec![PathBuf::from("docs/guide/page.mdx"), PathBuf::from("page.mdx")]
        );
        assert_eq!(summary.meta_files, vec![PathBuf::from("_meta.js")]);
        assert_eq!(
            h.fs.content("/site/app/page.mdx").unwrap(),
            "---\ntitle: Home\n---\n# Home\n"
        );
        assert!(h.fs.content("/site/app/docs/guide/page.mdx").is_some());
        assert!(h
            .fs
            .content("/site/app/_meta.js")
            .unwrap()
            .starts_with("'use client'"));
        assert!(h.fs.content("/site/app/layout.jsx").is_some());
        assert!(h.fs.content("/site/app/globals.css").is_some());
        assert!(h.fs.content("/site/tailwind.config.js").is_some());
        assert!(h.fs.content("/site/app/_app.jsx").is_none());
        assert!(h.fs.exists(Path::new("/site/pages/index.mdx")));
        assert!(h.reporter.contains("remove or rename pages/"));
        assert!(h.reporter.contains("tailwindcss is required"));
    }

    #[test]
    fn auto_rename_moves_pages_aside() {
        let mut h = Harness::new(site().with_file("/site/pages.bak/stale.mdx", "old"));
        h.options.auto_rename = true;

        migrate_pages(&h.ctx(), Path::new("/site/pages")).unwrap();

        assert!(!h.fs.exists(Path::new("/site/pages")));
        assert!(h.fs.exists(Path::new("/site/pages.bak/index.mdx")));
        assert!(!h.fs.exists(Path::new("/site/pages.bak/stale.mdx")));
        assert!(h.fs.exists(Path::new("/site/app/docs/guide/page.mdx")));
        assert!(!h.reporter.contains("remove or rename pages/"));
    }

    #[test]
    fn undecodable_page_is_skipped_with_a_warning() {
        let h = Harness::new(site().with_undecodable_file("/site/pages/docs/latin1.mdx"));
        let summary = migrate_pages(&h.ctx(), Path::new("/site/pages")).unwrap();

        assert_eq!(summary.pages.len(), 2);
        assert!(h.fs.content("/site/app/docs/latin1/page.mdx").is_none());
        assert!(h.fs.content("/site/app/docs/guide/page.mdx").is_some());
        assert!(h.reporter.contains("skipped, move it to app/ by hand"));
    }

    #[test]
    fn root_meta_is_scaffolded_when_pages_have_none() {
        let h = Harness::new(
            MemoryFileSystem::new().with_file("/site/pages/index.mdx", "---\ntitle: Home\n---\n"),
        );
        migrate_pages(&h.ctx(), Path::new("/site/pages")).unwrap();
        assert_eq!(h.fs.content("/site/app/_meta.js").unwrap(), templates::APP_META);
    }

    #[test]
    fn existing_layout_is_not_replaced() {
        let h = Harness::new(site().with_file("/site/app/layout.jsx", "// mine"));
        migrate_pages(&h.ctx(), Path::new("/site/pages")).unwrap();
        assert_eq!(h.fs.content("/site/app/layout.jsx").unwrap(), "// mine");
    }

    #[test]
    fn missing_pages_directory_is_an_error() {
        let h = Harness::new(MemoryFileSystem::new());
        assert!(migrate_pages(&h.ctx(), Path::new("/site/pages")).is_err());
    }
}
