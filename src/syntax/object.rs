//! Object-literal queries over a parsed source.
//!
//! The rewrite rules only ever need a handful of shapes: the object exported
//! by default, its properties, and every nested object inside it. Lookups
//! are first-match-wins and a shape that is not found is simply `None`.

use crate::syntax::parser::{named_children, node_text, SourceTree};
use tree_sitter::Node;

/// Bound on identifier/call unwrapping so self-referential bindings cannot loop.
const MAX_RESOLVE_DEPTH: usize = 8;

/// An `{ ... }` expression in the tree.
#[derive(Debug, Clone, Copy)]
pub struct ObjectLiteral<'t> {
    node: Node<'t>,
}

/// One member of an object literal.
#[derive(Debug, Clone)]
pub struct Property<'t> {
    /// Key as written, without quotes. Computed keys keep their brackets.
    pub key: String,
    /// The whole member, key and value.
    pub node: Node<'t>,
    /// The value expression. For shorthand members this is the identifier.
    pub value: Option<Node<'t>>,
}

impl<'t> ObjectLiteral<'t> {
    /// Wrap `node` when it is an object expression.
    pub fn from_node(node: Node<'t>) -> Option<Self> {
        (node.kind() == "object").then_some(Self { node })
    }

    pub fn node(&self) -> Node<'t> {
        self.node
    }

    /// Key of the `key: { ... }` member this object is the value of.
    pub fn owner_key(&self, source: &str) -> Option<String> {
        let pair = self.node.parent().filter(|p| p.kind() == "pair")?;
        let value = pair.child_by_field_name("value")?;
        if value.id() != self.node.id() {
            return None;
        }
        Some(key_name(pair.child_by_field_name("key")?, source))
    }

    /// Members in source order. Spread elements are not properties.
    pub fn properties(&self, source: &str) -> Vec<Property<'t>> {
        named_children(self.node)
            .into_iter()
            .filter_map(|member| property_of(member, source))
            .collect()
    }

    /// First property accepted by `matcher`.
    pub fn find(&self, source: &str, matcher: &PropertyMatcher<'_>) -> Option<Property<'t>> {
        self.properties(source)
            .into_iter()
            .find(|prop| matcher.matches(prop, source))
    }

    pub fn get(&self, source: &str, key: &str) -> Option<Property<'t>> {
        self.find(source, &PropertyMatcher::key(key))
    }

    /// Value of `key` when it is itself an object literal.
    pub fn get_object(&self, source: &str, key: &str) -> Option<ObjectLiteral<'t>> {
        self.get(source, key)
            .and_then(|prop| prop.value)
            .and_then(ObjectLiteral::from_node)
    }

    /// Value of `key` when it is a plain string literal.
    pub fn get_string(&self, source: &str, key: &str) -> Option<String> {
        self.get(source, key)
            .and_then(|prop| prop.value)
            .and_then(|value| string_value(value, source))
    }
}

fn property_of<'t>(member: Node<'t>, source: &str) -> Option<Property<'t>> {
    match member.kind() {
        "pair" => {
            let key = member.child_by_field_name("key")?;
            Some(Property {
                key: key_name(key, source),
                node: member,
                value: member.child_by_field_name("value"),
            })
        }
        "shorthand_property_identifier" => Some(Property {
            key: node_text(&member, source).to_string(),
            node: member,
            value: Some(member),
        }),
        "method_definition" => {
            let name = member.child_by_field_name("name")?;
            Some(Property {
                key: key_name(name, source),
                node: member,
                value: Some(member),
            })
        }
        _ => None,
    }
}

fn key_name(key: Node<'_>, source: &str) -> String {
    string_value(key, source).unwrap_or_else(|| node_text(&key, source).to_string())
}

/// Contents of a string literal (or a template literal without
/// substitutions), without the surrounding quotes.
pub fn string_value(node: Node<'_>, source: &str) -> Option<String> {
    match node.kind() {
        "string" => {
            let text = node_text(&node, source);
            Some(text.get(1..text.len().saturating_sub(1))?.to_string())
        }
        "template_string" => {
            let has_substitution = named_children(node)
                .iter()
                .any(|child| child.kind() == "template_substitution");
            if has_substitution {
                return None;
            }
            let text = node_text(&node, source);
            Some(text.get(1..text.len().saturating_sub(1))?.to_string())
        }
        _ => None,
    }
}

/// Predicate over properties: by key, optionally also by literal value.
#[derive(Debug, Clone, Copy)]
pub struct PropertyMatcher<'a> {
    key: &'a str,
    literal: Option<&'a str>,
}

impl<'a> PropertyMatcher<'a> {
    pub const fn key(key: &'a str) -> Self {
        Self { key, literal: None }
    }

    /// Additionally require the value to be the literal `value`: a string
    /// with that content, or a bare literal such as `true` spelled that way.
    pub const fn with_literal(self, value: &'a str) -> Self {
        Self {
            key: self.key,
            literal: Some(value),
        }
    }

    pub fn matches(&self, prop: &Property<'_>, source: &str) -> bool {
        if prop.key != self.key {
            return false;
        }
        let Some(expected) = self.literal else {
            return true;
        };
        let Some(value) = prop.value else {
            return false;
        };
        match string_value(value, source) {
            Some(text) => text == expected,
            None => node_text(&value, source) == expected,
        }
    }
}

/// Depth-first, pre-order walk over `node` and every object literal below it.
pub fn visit_objects<'t>(node: Node<'t>, visit: &mut dyn FnMut(ObjectLiteral<'t>)) {
    if let Some(object) = ObjectLiteral::from_node(node) {
        visit(object);
    }
    for child in named_children(node) {
        visit_objects(child, visit);
    }
}

/// Locate the object literal a module exports by default.
///
/// Accepted shapes, first match wins: a literal, a literal wrapped in
/// parentheses / `satisfies` / `as`, an identifier bound at top level to one
/// of those, or a call whose first argument is one of those
/// (`defineConfig({...})`).
pub fn default_export_object(tree: &SourceTree) -> Option<ObjectLiteral<'_>> {
    let source = tree.source.as_str();
    named_children(tree.root())
        .into_iter()
        .filter(|stmt| stmt.kind() == "export_statement" && is_default_export(*stmt))
        .find_map(|stmt| {
            let value = stmt.child_by_field_name("value")?;
            resolve_object(tree, value, source, 0)
        })
}

fn is_default_export(stmt: Node<'_>) -> bool {
    (0..stmt.child_count())
        .filter_map(|i| stmt.child(i))
        .any(|child| child.kind() == "default")
}

fn resolve_object<'t>(
    tree: &'t SourceTree,
    node: Node<'t>,
    source: &str,
    depth: usize,
) -> Option<ObjectLiteral<'t>> {
    if depth > MAX_RESOLVE_DEPTH {
        return None;
    }
    match node.kind() {
        "object" => ObjectLiteral::from_node(node),
        "parenthesized_expression" | "satisfies_expression" | "as_expression"
        | "non_null_expression" => {
            let inner = node.named_child(0)?;
            resolve_object(tree, inner, source, depth + 1)
        }
        "identifier" => {
            let name = node_text(&node, source);
            let value = find_top_level_binding(tree, name)?;
            resolve_object(tree, value, source, depth + 1)
        }
        "call_expression" => {
            let arguments = node.child_by_field_name("arguments")?;
            let first = arguments.named_child(0)?;
            resolve_object(tree, first, source, depth + 1)
        }
        _ => None,
    }
}

/// Initializer of a top-level `const`/`let`/`var` named `name`, including
/// `export const` declarations.
fn find_top_level_binding<'t>(tree: &'t SourceTree, name: &str) -> Option<Node<'t>> {
    let source = tree.source.as_str();
    named_children(tree.root())
        .into_iter()
        .filter_map(|stmt| match stmt.kind() {
            "lexical_declaration" | "variable_declaration" => Some(stmt),
            "export_statement" => stmt
                .child_by_field_name("declaration")
                .filter(|d| matches!(d.kind(), "lexical_declaration" | "variable_declaration")),
            _ => None,
        })
        .flat_map(named_children)
        .filter(|decl| decl.kind() == "variable_declarator")
        .find(|decl| {
            decl.child_by_field_name("name")
                .is_some_and(|n| node_text(&n, source) == name)
        })
        .and_then(|decl| decl.child_by_field_name("value"))
}

/// Whether the file's directive prologue contains `'<directive>'`.
pub fn has_directive(tree: &SourceTree, directive: &str) -> bool {
    let source = tree.source.as_str();
    for stmt in named_children(tree.root()) {
        match stmt.kind() {
            "comment" | "hash_bang_line" => continue,
            "expression_statement" => {
                let Some(literal) = stmt.named_child(0).filter(|n| n.kind() == "string") else {
                    return false;
                };
                if string_value(literal, source).as_deref() == Some(directive) {
                    return true;
                }
            }
            _ => return false,
        }
    }
    false
}

/// Top-level import statements as `(module specifier, full statement text)`.
pub fn import_statements(tree: &SourceTree) -> Vec<(String, String)> {
    let source = tree.source.as_str();
    named_children(tree.root())
        .into_iter()
        .filter(|stmt| stmt.kind() == "import_statement")
        .filter_map(|stmt| {
            let specifier = stmt.child_by_field_name("source")?;
            Some((
                string_value(specifier, source)?,
                node_text(&stmt, source).to_string(),
            ))
        })
        .collect()
}
