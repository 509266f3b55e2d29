//! `theme.config.*` `components` → `mdx-components.jsx`.

use super::theme_config::{extract_theme_fields, is_theme_config, write_mdx_components};
use super::{Artifact, Transform, TransformContext};
use crate::errors::Result;
use crate::syntax::parse_source;
use std::path::Path;

pub struct MigrateMdxComponents;

impl Transform for MigrateMdxComponents {
    fn name(&self) -> &'static str {
        "migrate-mdx-components"
    }

    fn description(&self) -> &'static str {
        "Create mdx-components.jsx from the theme.config components map"
    }

    fn matches(&self, path: &Path) -> bool {
        is_theme_config(path)
    }

    fn apply(&self, artifact: &Artifact, ctx: &TransformContext<'_>) -> Result<String> {
        let tree = parse_source(&artifact.content, &artifact.path)?;
        let fields = extract_theme_fields(&tree);

        match fields {
            Some(fields) => match &fields.components {
                Some(components) => {
                    write_mdx_components(ctx, &fields.layout, components)?;
                }
                None => ctx
                    .reporter
                    .info("No components property found in theme config"),
            },
            None => ctx.reporter.info(format!(
                "No default-exported object in {}",
                ctx.display_path(&artifact.path)
            )),
        }

        Ok(artifact.content.clone())
    }
}
