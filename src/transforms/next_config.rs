//! `next.config.{mjs,js}` rewrite onto the Nextra 4 `nextra(...)` factory.
//!
//! The Next.js options passed to the wrapper (`withNextra(...)`) are kept
//! verbatim. Nextra options lose `theme` and `themeConfig`, which moved into
//! `app/layout.jsx`; whatever else they held is carried over.

use super::{file_name, Artifact, Transform, TransformContext};
use crate::errors::Result;
use crate::io::{backup, FileSystem};
use crate::syntax::{
    default_export_object, named_children, node_text, parse_source, ObjectLiteral,
    PropertyMatcher, SourceTree,
};
use crate::templates::{self, ModuleKind, DEFAULT_NEXTRA_OPTIONS, DEFAULT_NEXT_OPTIONS};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tree_sitter::Node;

/// Lookup order for an existing config.
pub const NEXT_CONFIG_NAMES: [&str; 2] = ["next.config.mjs", "next.config.js"];

const LEGACY_NEXTRA_OPTIONS: [PropertyMatcher<'static>; 2] = [
    PropertyMatcher::key("theme"),
    PropertyMatcher::key("themeConfig"),
];

static IMPORT_BINDING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"import\s+(\w+)\s+from\s+['"]nextra['"]"#).unwrap());
static REQUIRE_BINDING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:const|let|var)\s+(\w+)\s*=\s*require\(\s*['"]nextra['"]\s*\)\s*(?:;|\n|$)"#).unwrap()
});
static REQUIRE_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^require\(\s*['"]nextra['"]\s*\)$"#).unwrap());
static ESM_SYNTAX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(import\s|export\s+default\b)").unwrap());

/// First existing config under `root`, `.mjs` before `.js`.
pub fn find_next_config(fs: &dyn FileSystem, root: &Path) -> Option<PathBuf> {
    NEXT_CONFIG_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|path| fs.is_file(path))
}

pub fn module_kind(path: &Path, source: &str) -> ModuleKind {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("mjs" | "mts") => ModuleKind::Esm,
        Some("cjs" | "cts") => ModuleKind::CommonJs,
        _ if ESM_SYNTAX.is_match(source) => ModuleKind::Esm,
        _ => ModuleKind::CommonJs,
    }
}

/// What an existing config passes to Nextra and to Next.js, as source text.
/// `None` where the config has nothing to carry over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOptions {
    pub nextra: Option<String>,
    pub next: Option<String>,
}

pub fn config_options(source: &str, path: &Path) -> Result<ConfigOptions> {
    if source.trim().is_empty() {
        return Ok(ConfigOptions::default());
    }

    let tree = parse_source(source, path)?;
    let src = tree.source.as_str();
    let mut calls = Vec::new();
    collect_calls(tree.root(), &mut calls);

    let factories = factory_bindings(src);
    let mut wrappers: BTreeSet<String> = BTreeSet::from(["withNextra".to_string()]);
    let mut nextra = None;

    for call in &calls {
        let Some(callee) = call.child_by_field_name("function") else {
            continue;
        };
        if !is_nextra_factory(callee, src, &factories) {
            continue;
        }
        if let Some(name) = declared_name(*call, src) {
            wrappers.insert(name);
        }
        if nextra.is_none() {
            nextra = first_argument(*call)
                .and_then(ObjectLiteral::from_node)
                .and_then(|object| kept_nextra_options(object, src));
        }
    }

    let next = calls
        .iter()
        .filter(|call| {
            call.child_by_field_name("function")
                .is_some_and(|callee| callee.kind() == "identifier" && wrappers.contains(text(callee, src)))
        })
        .find_map(|call| first_argument(*call))
        .map(|arg| text(arg, src).to_string())
        .or_else(|| plain_export(&tree));

    Ok(ConfigOptions { nextra, next })
}

/// The Nextra 4 config equivalent to `source`.
pub fn migrate_next_config_source(source: &str, path: &Path) -> Result<String> {
    let options = config_options(source, path)?;
    Ok(templates::next_config(
        module_kind(path, source),
        options.nextra.as_deref().unwrap_or(DEFAULT_NEXTRA_OPTIONS),
        options.next.as_deref().unwrap_or(DEFAULT_NEXT_OPTIONS),
    ))
}

fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node_text(&node, source)
}

fn collect_calls<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    if node.kind() == "call_expression" {
        out.push(node);
    }
    for child in named_children(node) {
        collect_calls(child, out);
    }
}

/// Local names the `nextra` default export is bound to.
fn factory_bindings(source: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::from(["nextra".to_string()]);
    for re in [&*IMPORT_BINDING, &*REQUIRE_BINDING] {
        names.extend(re.captures_iter(source).map(|caps| caps[1].to_string()));
    }
    names
}

fn is_nextra_factory(callee: Node<'_>, source: &str, factories: &BTreeSet<String>) -> bool {
    match callee.kind() {
        "identifier" => factories.contains(text(callee, source)),
        "call_expression" => REQUIRE_CALL.is_match(text(callee, source)),
        _ => false,
    }
}

/// Name of the `const x = <call>` binding `call` initialises, if any.
fn declared_name(call: Node<'_>, source: &str) -> Option<String> {
    let declarator = call.parent().filter(|p| p.kind() == "variable_declarator")?;
    let name = declarator.child_by_field_name("name")?;
    Some(text(name, source).to_string())
}

fn first_argument(call: Node<'_>) -> Option<Node<'_>> {
    let args = call.child_by_field_name("arguments")?;
    named_children(args)
        .into_iter()
        .find(|arg| arg.kind() != "comment")
}

fn kept_nextra_options(object: ObjectLiteral<'_>, source: &str) -> Option<String> {
    let members = named_children(object.node());
    for spread in members.iter().filter(|n| n.kind() == "spread_element") {
        log::info!("Dropping spread in nextra options: {}", text(*spread, source));
    }
    let kept: Vec<&str> = object
        .properties(source)
        .iter()
        .filter(|prop| !LEGACY_NEXTRA_OPTIONS.iter().any(|m| m.matches(prop, source)))
        .map(|prop| text(prop.node, source))
        .collect();
    if kept.is_empty() {
        return None;
    }
    Some(format!("{{\n  {}\n}}", kept.join(",\n  ")))
}

/// A config without Nextra: keep an `export default { ... }` object.
fn plain_export(tree: &SourceTree) -> Option<String> {
    default_export_object(tree).map(|object| tree.text(object.node()).to_string())
}

pub struct UpdateNextConfig;

impl Transform for UpdateNextConfig {
    fn name(&self) -> &'static str {
        "update-next-config"
    }

    fn description(&self) -> &'static str {
        "Rewrite next.config.{js,mjs} for the Nextra 4 plugin API"
    }

    fn matches(&self, path: &Path) -> bool {
        NEXT_CONFIG_NAMES.contains(&file_name(path))
    }

    fn apply(&self, artifact: &Artifact, ctx: &TransformContext<'_>) -> Result<String> {
        let path = &artifact.path;
        let existed = ctx.fs.is_file(path);
        if existed {
            let saved = backup(ctx.fs, path)?;
            ctx.reporter
                .info(format!("Backed up {} to {}", ctx.display_path(path), ctx.display_path(&saved)));
        }

        let updated = migrate_next_config_source(&artifact.content, path)?;
        ctx.fs.write_with_parents(path, &updated)?;
        ctx.reporter.success(format!(
            "{} {}",
            if existed { "Updated" } else { "Created" },
            ctx.display_path(path)
        ));
        Ok(artifact.content.clone())
    }
}
