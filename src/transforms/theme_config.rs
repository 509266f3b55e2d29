//! `theme.config.*` → `app/layout.jsx` (+ `mdx-components.jsx`).
//!
//! | field                | emitted as                                   |
//! |----------------------|----------------------------------------------|
//! | `logo`               | `<Navbar logo={...}>`                        |
//! | `project.link`       | `<Navbar projectLink="...">`                 |
//! | `docsRepositoryBase` | `<Layout docsRepositoryBase="...">`          |
//! | `footer`             | `<Layout footer={<Footer>...</Footer>}>`     |
//! | `i18n`               | `<Layout i18n={[...]}>`                      |
//! | `components`         | `mdx-components.jsx`                         |
//! | `theme`              | docs or blog theme package                   |

use super::{file_name, Artifact, Transform, TransformContext};
use crate::errors::Result;
use crate::syntax::parser::node_text;
use crate::syntax::{
    default_export_object, import_statements, parse_source, string_value, ObjectLiteral,
    SourceTree,
};
use crate::templates::{self, LayoutFields, Locale, ThemePackage};
use std::path::{Path, PathBuf};
use tree_sitter::Node;

const FOOTER_PLACEHOLDER: &str = "{/* Your footer content */}";

/// Everything read out of a theme configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeFields {
    pub layout: LayoutFields,
    /// Source text of the `components` value, when present.
    pub components: Option<String>,
}

/// Read the known fields from the default-exported object.
/// `None` when the module has no such object.
pub fn extract_theme_fields(tree: &SourceTree) -> Option<ThemeFields> {
    let object = default_export_object(tree)?;
    let src = tree.source.as_str();
    let mut layout = LayoutFields {
        imports: carried_imports(tree),
        ..LayoutFields::default()
    };

    if object.get_string(src, "theme").as_deref() == Some("nextra-theme-blog") {
        layout.theme = ThemePackage::Blog;
    }

    if let Some(value) = object.get(src, "logo").and_then(|p| p.value) {
        let (logo, helper) = logo_expression(value, src);
        layout.logo = Some(logo);
        layout.helpers.extend(helper);
    }

    layout.project_link = object
        .get_object(src, "project")
        .and_then(|project| project.get_string(src, "link"));
    layout.docs_repository_base = object.get_string(src, "docsRepositoryBase");
    layout.footer = object
        .get(src, "footer")
        .and_then(|p| p.value)
        .map(|value| footer_children(value, src));
    layout.i18n = object
        .get(src, "i18n")
        .and_then(|p| p.value)
        .map(|value| locales(value, src))
        .unwrap_or_default();

    let components = object
        .get(src, "components")
        .and_then(|p| p.value)
        .map(|value| node_text(&value, src).to_string());

    Some(ThemeFields { layout, components })
}

/// Imports the embedded expressions may need. Theme and framework imports
/// and type-only imports are dropped.
fn carried_imports(tree: &SourceTree) -> Vec<String> {
    import_statements(tree)
        .into_iter()
        .filter(|(specifier, text)| {
            !specifier.starts_with("nextra") && !text.starts_with("import type")
        })
        .map(|(_, text)| text)
        .collect()
}

fn function_body<'t>(value: Node<'t>) -> Option<Node<'t>> {
    match value.kind() {
        "arrow_function" | "function_expression" | "function" | "method_definition" => {
            value.child_by_field_name("body")
        }
        _ => None,
    }
}

/// JSX expression for the logo, plus a helper component when the old value
/// was a function with a statement body.
fn logo_expression(value: Node<'_>, src: &str) -> (String, Option<String>) {
    match function_body(value) {
        Some(body) if body.kind() == "statement_block" => (
            "<Logo />".to_string(),
            Some(format!("function Logo() {}", node_text(&body, src))),
        ),
        Some(body) => (node_text(&body, src).to_string(), None),
        None => (node_text(&value, src).to_string(), None),
    }
}

fn footer_children(value: Node<'_>, src: &str) -> String {
    if let Some(object) = ObjectLiteral::from_node(value) {
        let content = object
            .get(src, "content")
            .or_else(|| object.get(src, "text"))
            .and_then(|p| p.value);
        return match content {
            Some(content) => jsx_child(content, src),
            None => FOOTER_PLACEHOLDER.to_string(),
        };
    }
    if is_jsx(value) {
        return node_text(&value, src).to_string();
    }
    FOOTER_PLACEHOLDER.to_string()
}

/// Render an expression as JSX children.
fn jsx_child(value: Node<'_>, src: &str) -> String {
    if is_jsx(value) {
        return node_text(&value, src).to_string();
    }
    if let Some(text) = string_value(value, src) {
        return text;
    }
    if function_body(value).is_some() {
        return format!("{{({})()}}", node_text(&value, src));
    }
    format!("{{{}}}", node_text(&value, src))
}

fn is_jsx(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "jsx_element" | "jsx_self_closing_element" | "jsx_fragment"
    ) || (node.kind() == "parenthesized_expression"
        && node.named_child(0).is_some_and(is_jsx))
}

fn locales(value: Node<'_>, src: &str) -> Vec<Locale> {
    if value.kind() != "array" {
        return Vec::new();
    }
    (0..value.named_child_count())
        .filter_map(|i| value.named_child(i))
        .filter_map(ObjectLiteral::from_node)
        .filter_map(|entry| {
            let locale = entry.get_string(src, "locale")?;
            let name = entry
                .get_string(src, "name")
                .or_else(|| entry.get_string(src, "text"))
                .unwrap_or_else(|| locale.clone());
            Some(Locale { locale, name })
        })
        .collect()
}

/// Write `mdx-components.jsx` at the project root.
pub fn write_mdx_components(
    ctx: &TransformContext<'_>,
    layout: &LayoutFields,
    components: &str,
) -> Result<PathBuf> {
    let path = ctx.root_path("mdx-components.jsx");
    let content = templates::mdx_components(layout.theme, &layout.imports, components);
    ctx.fs.write_with_parents(&path, &content)?;
    ctx.reporter.success(format!("Created {}", ctx.display_path(&path)));
    Ok(path)
}

/// Any file whose name contains `theme.config`, e.g. `theme.config.jsx` or
/// `docs.theme.config.tsx`. Shared by both theme-config units.
pub(crate) fn is_theme_config(path: &Path) -> bool {
    file_name(path).contains("theme.config")
}

pub struct MigrateThemeConfig;

impl Transform for MigrateThemeConfig {
    fn name(&self) -> &'static str {
        "migrate-theme-config"
    }

    fn description(&self) -> &'static str {
        "Generate app/layout.jsx (and mdx-components.jsx) from theme.config"
    }

    fn matches(&self, path: &Path) -> bool {
        is_theme_config(path)
    }

    fn apply(&self, artifact: &Artifact, ctx: &TransformContext<'_>) -> Result<String> {
        let tree = parse_source(&artifact.content, &artifact.path)?;
        let Some(fields) = extract_theme_fields(&tree) else {
            ctx.reporter.warn(format!(
                "No default-exported object in {}; nothing to migrate",
                ctx.display_path(&artifact.path)
            ));
            return Ok(artifact.content.clone());
        };

        let app_dir = ctx.root_path("app");
        ctx.fs.create_dir_all(&app_dir)?;

        let layout_path = app_dir.join("layout.jsx");
        if ctx.fs.exists(&layout_path) {
            log::info!("Overwriting {}", layout_path.display());
        }
        ctx.fs
            .write(&layout_path, &templates::layout(&fields.layout))?;
        ctx.reporter
            .success(format!("Created {}", ctx.display_path(&layout_path)));

        let globals = app_dir.join("globals.css");
        if ctx.fs.write_if_absent(&globals, templates::GLOBALS_CSS_BASE)? {
            ctx.reporter
                .success(format!("Created {}", ctx.display_path(&globals)));
        }

        if let Some(components) = &fields.components {
            write_mdx_components(ctx, &fields.layout, components)?;
        }

        Ok(artifact.content.clone())
    }
}
