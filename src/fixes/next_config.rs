//! Known-good Nextra 4 `next.config` for projects whose config is beyond repair.

use crate::errors::Result;
use crate::io::backup;
use crate::templates::{self, DEFAULT_NEXTRA_OPTIONS, STRICT_NEXT_OPTIONS};
use crate::transforms::next_config::{find_next_config, module_kind};
use crate::transforms::TransformContext;
use std::path::PathBuf;

/// Overwrite the existing config (or create `next.config.js`). Returns the
/// path written.
pub fn fix_next_config(ctx: &TransformContext<'_>) -> Result<PathBuf> {
    let path = find_next_config(ctx.fs, &ctx.options.project_root)
        .unwrap_or_else(|| ctx.root_path("next.config.js"));

    let existing = if ctx.fs.is_file(&path) {
        let source = ctx.fs.read_to_string(&path)?;
        backup(ctx.fs, &path)?;
        source
    } else {
        String::new()
    };

    let kind = module_kind(&path, &existing);
    ctx.fs.write(
        &path,
        &templates::next_config(kind, DEFAULT_NEXTRA_OPTIONS, STRICT_NEXT_OPTIONS),
    )?;
    ctx.reporter
        .success(format!("Wrote {}", ctx.display_path(&path)));
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::ModuleKind;
    use crate::testkit::MemoryFileSystem;
    use crate::transforms::test_support::Harness;
    use pretty_assertions::assert_eq;

    #[test]
    fn creates_commonjs_config_when_missing() {
        let h = Harness::new(MemoryFileSystem::new().with_dir("/site"));
        let path = fix_next_config(&h.ctx()).unwrap();
        assert_eq!(path, PathBuf::from("/site/next.config.js"));
        assert_eq!(
            h.fs.content(&path).unwrap(),
            templates::next_config(ModuleKind::CommonJs, DEFAULT_NEXTRA_OPTIONS, STRICT_NEXT_OPTIONS)
        );
    }

    #[test]
    fn existing_mjs_is_backed_up_and_replaced() {
        let h = Harness::new(
            MemoryFileSystem::new().with_file("/site/next.config.mjs", "export default broken("),
        );
        fix_next_config(&h.ctx()).unwrap();
        assert_eq!(
            h.fs.content("/site/next.config.mjs.bak").unwrap(),
            "export default broken("
        );
        assert!(h
            .fs
            .content("/site/next.config.mjs")
            .unwrap()
            .starts_with("import nextra from 'nextra'"));
    }
}
