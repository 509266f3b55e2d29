//! `_meta.*` navigation descriptors.
//!
//! Removed from every object in the default export:
//! - `newWindow`
//! - inside `theme`: `layout: 'raw'`, `topContent`, `bottomContent`
//!
//! The file also gains a `'use client'` directive when it has none.

use super::{file_name, Artifact, Transform, TransformContext};
use crate::errors::Result;
use crate::syntax::{
    default_export_object, has_directive, parse_source, visit_objects, PropertyMatcher,
    TextEdits,
};
use std::path::Path;

pub const USE_CLIENT: &str = "use client";

const META_NAMES: [&str; 4] = ["_meta.js", "_meta.jsx", "_meta.ts", "_meta.tsx"];

const DEPRECATED: [PropertyMatcher<'static>; 1] = [PropertyMatcher::key("newWindow")];

const DEPRECATED_IN_THEME: [PropertyMatcher<'static>; 3] = [
    PropertyMatcher::key("layout").with_literal("raw"),
    PropertyMatcher::key("topContent"),
    PropertyMatcher::key("bottomContent"),
];

pub fn is_meta_file(path: &Path) -> bool {
    META_NAMES.contains(&file_name(path))
}

/// Rewrite one descriptor. Applying this to its own output changes nothing.
pub fn migrate_meta_source(source: &str, path: &Path) -> Result<String> {
    let tree = parse_source(source, path)?;
    let src = tree.source.as_str();
    let mut edits = TextEdits::new();

    if let Some(root) = default_export_object(&tree) {
        visit_objects(root.node(), &mut |object| {
            let in_theme = object.owner_key(src).as_deref() == Some("theme");
            let doomed: Vec<_> = object
                .properties(src)
                .into_iter()
                .filter(|prop| {
                    DEPRECATED.iter().any(|m| m.matches(prop, src))
                        || (in_theme && DEPRECATED_IN_THEME.iter().any(|m| m.matches(prop, src)))
                })
                .map(|prop| prop.node)
                .collect();
            edits.remove_properties(src, &doomed);
        });
    }

    let mut out = edits.apply(source);
    if !has_directive(&tree, USE_CLIENT) {
        out = format!("'{}'\n\n{}", USE_CLIENT, out);
    }
    Ok(out)
}

pub struct MigrateMetaFiles;

impl Transform for MigrateMetaFiles {
    fn name(&self) -> &'static str {
        "migrate-meta-files"
    }

    fn description(&self) -> &'static str {
        "Strip deprecated _meta fields and add the 'use client' directive"
    }

    fn matches(&self, path: &Path) -> bool {
        is_meta_file(path)
    }

    fn apply(&self, artifact: &Artifact, ctx: &TransformContext<'_>) -> Result<String> {
        let migrated = migrate_meta_source(&artifact.content, &artifact.path)?;
        if migrated != artifact.content {
            ctx.reporter
                .success(format!("Migrated {}", ctx.display_path(&artifact.path)));
        }
        Ok(migrated)
    }
}
