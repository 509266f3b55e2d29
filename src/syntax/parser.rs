//! Tree-sitter parser integration for JavaScript/TypeScript
//!
//! Provides parsing using tree-sitter grammars for JS/TS/JSX/TSX.

use crate::errors::{MigrateError, Result};
use std::path::{Path, PathBuf};
use tree_sitter::{Language as TsLanguage, Node, Parser, Tree};

/// Grammar flavour selected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsVariant {
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
}

impl JsVariant {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "js" | "mjs" | "cjs" => Some(Self::JavaScript),
            "jsx" => Some(Self::Jsx),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }
}

/// Get the tree-sitter language for a JS variant
fn get_language(variant: JsVariant) -> TsLanguage {
    match variant {
        JsVariant::JavaScript | JsVariant::Jsx => tree_sitter_javascript::LANGUAGE.into(),
        JsVariant::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        JsVariant::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
    }
}

/// A parsed source file together with the text it was parsed from.
pub struct SourceTree {
    pub tree: Tree,
    pub source: String,
    pub path: PathBuf,
    pub variant: JsVariant,
}

impl SourceTree {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by `node`.
    pub fn text(&self, node: Node<'_>) -> &str {
        node_text(&node, &self.source)
    }

    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }
}

/// Parse JavaScript/TypeScript source code into a tree-sitter tree
///
/// Trees with syntax errors are still returned; tree-sitter recovers and the
/// callers only look for well-formed shapes.
pub fn parse_source(content: &str, path: &Path) -> Result<SourceTree> {
    let variant = detect_variant(path);
    let mut parser = Parser::new();

    parser
        .set_language(&get_language(variant))
        .map_err(|e| MigrateError::parse(path, format!("unsupported grammar: {}", e)))?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| MigrateError::parse(path, "parser returned no tree"))?;

    if tree.root_node().has_error() {
        log::debug!("{} has syntax errors; continuing with recovered tree", path.display());
    }

    Ok(SourceTree {
        tree,
        source: content.to_string(),
        path: path.to_path_buf(),
        variant,
    })
}

/// Determine language variant from file path
pub fn detect_variant(path: &Path) -> JsVariant {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(JsVariant::from_extension)
        .unwrap_or(JsVariant::JavaScript)
}

/// Get text for a tree-sitter node
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Named children of `node`, in source order.
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    (0..node.named_child_count())
        .filter_map(|i| node.named_child(i))
        .collect()
}
