//! Code Hike syntax highlighting.
//!
//! Unlike most units this one rewrites its input in place. Each recognised
//! file gets one change: the dependency in `package.json`, the stylesheet
//! import in `globals.css`, or `CH` registered in `mdx-components.*`.

use super::{file_name, Artifact, Transform, TransformContext};
use crate::errors::Result;
use crate::manifest::{Manifest, Section, MANIFEST_FILE};
use crate::syntax::{
    import_statements, named_children, node_text, parse_source, ObjectLiteral, SourceTree,
    TextEdits,
};
use std::path::Path;
use tree_sitter::Node;

pub const CODE_HIKE_PACKAGE: &str = "@code-hike/mdx";
pub const CODE_HIKE_VERSION: &str = "^0.9.0";
pub const CODE_HIKE_STYLES: &str = "@import '@code-hike/mdx/styles.css';";
pub const CODE_HIKE_IMPORT: &str = "import { CH } from '@code-hike/mdx/components'";

const COMPONENTS_HOOK: &str = "useMDXComponents";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Manifest,
    Stylesheet,
    Components,
}

fn target(path: &Path) -> Option<Target> {
    let name = file_name(path);
    if name == MANIFEST_FILE {
        Some(Target::Manifest)
    } else if name == "globals.css" {
        Some(Target::Stylesheet)
    } else if name.starts_with("mdx-components.") {
        Some(Target::Components)
    } else {
        None
    }
}

pub fn add_dependency(source: &str, path: &Path) -> Result<String> {
    let mut manifest = Manifest::parse(path, source)?;
    if !manifest.add_if_absent(Section::Dependencies, CODE_HIKE_PACKAGE, CODE_HIKE_VERSION) {
        return Ok(source.to_string());
    }
    manifest.to_json_string()
}

pub fn add_stylesheet(source: &str) -> String {
    if source.contains(CODE_HIKE_STYLES) {
        return source.to_string();
    }
    format!("{}\n{}", CODE_HIKE_STYLES, source)
}

/// Import `CH` and add it to the object `useMDXComponents` returns.
pub fn register_component(source: &str, path: &Path) -> Result<String> {
    let tree = parse_source(source, path)?;
    let src = tree.source.as_str();
    let mut edits = TextEdits::new();

    let imported = import_statements(&tree)
        .iter()
        .any(|(specifier, _)| specifier.starts_with(CODE_HIKE_PACKAGE));
    if !imported {
        let anchor = named_children(tree.root())
            .into_iter()
            .filter(|stmt| stmt.kind() == "import_statement")
            .last();
        match anchor {
            Some(stmt) => edits.insert(stmt.end_byte(), format!("\n{}", CODE_HIKE_IMPORT)),
            None => edits.insert(0, format!("{}\n\n", CODE_HIKE_IMPORT)),
        }
    }

    match returned_components(&tree) {
        Some(object) if object.get(src, "CH").is_none() => {
            insert_member(&mut edits, src, object, "CH");
        }
        Some(_) => {}
        None => log::warn!(
            "{}: no object returned from {}; register CH manually",
            path.display(),
            COMPONENTS_HOOK
        ),
    }

    Ok(edits.apply(source))
}

/// The object literal returned by the `useMDXComponents` hook.
fn returned_components(tree: &SourceTree) -> Option<ObjectLiteral<'_>> {
    let src = tree.source.as_str();
    let hook = find_hook(tree.root(), src)?;
    let body = hook.child_by_field_name("body")?;
    if let Some(object) = unwrap_parens(body).and_then(ObjectLiteral::from_node) {
        return Some(object);
    }
    named_children(body)
        .into_iter()
        .filter(|stmt| stmt.kind() == "return_statement")
        .find_map(|stmt| stmt.named_child(0).and_then(unwrap_parens))
        .and_then(ObjectLiteral::from_node)
}

fn find_hook<'t>(node: Node<'t>, source: &str) -> Option<Node<'t>> {
    let named = |n: Node<'_>| {
        n.child_by_field_name("name")
            .is_some_and(|name| node_text(&name, source) == COMPONENTS_HOOK)
    };
    match node.kind() {
        "function_declaration" if named(node) => return Some(node),
        "variable_declarator" if named(node) => {
            return node
                .child_by_field_name("value")
                .filter(|v| matches!(v.kind(), "arrow_function" | "function_expression" | "function"));
        }
        _ => {}
    }
    named_children(node)
        .into_iter()
        .find_map(|child| find_hook(child, source))
}

fn unwrap_parens(node: Node<'_>) -> Option<Node<'_>> {
    let mut current = node;
    while current.kind() == "parenthesized_expression" {
        current = current.named_child(0)?;
    }
    Some(current)
}

/// Insert `member` as the first entry of `object`, matching its layout.
fn insert_member(edits: &mut TextEdits, source: &str, object: ObjectLiteral<'_>, member: &str) {
    let first = named_children(object.node())
        .into_iter()
        .find(|n| n.kind() != "comment");
    match first {
        Some(first) => {
            let line_start = source[..first.start_byte()].rfind('\n').map_or(0, |i| i + 1);
            let prefix = &source[line_start..first.start_byte()];
            let separator = if prefix.trim().is_empty() {
                format!(",\n{}", prefix)
            } else {
                ", ".to_string()
            };
            edits.insert(first.start_byte(), format!("{}{}", member, separator));
        }
        None => edits.insert(object.node().start_byte() + 1, format!(" {} ", member)),
    }
}

pub struct SetupCodeHike;

impl Transform for SetupCodeHike {
    fn name(&self) -> &'static str {
        "setup-code-hike"
    }

    fn description(&self) -> &'static str {
        "Add Code Hike to package.json, globals.css and mdx-components"
    }

    fn matches(&self, path: &Path) -> bool {
        target(path).is_some()
    }

    fn apply(&self, artifact: &Artifact, _ctx: &TransformContext<'_>) -> Result<String> {
        let source = artifact.content.as_str();
        match target(&artifact.path) {
            Some(Target::Manifest) => add_dependency(source, &artifact.path),
            Some(Target::Stylesheet) => Ok(add_stylesheet(source)),
            Some(Target::Components) => register_component(source, &artifact.path),
            None => Ok(artifact.content.clone()),
        }
    }
}
