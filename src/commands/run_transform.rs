//! Single-transform mode.

use crate::errors::{MigrateError, Result};
use crate::transforms::{registry, Artifact, TransformContext};
use std::path::Path;

/// Apply the transform `name` to `path`.
///
/// In-place units hand back rewritten content, which is written to `path`
/// when it differs from what was read.
///
/// # Errors
///
/// `UnknownTransform` and `MissingArgument` before anything is read; any
/// unit error afterwards.
pub fn run_transform(ctx: &TransformContext<'_>, name: &str, path: Option<&Path>) -> Result<()> {
    let unit = registry().resolve(name)?;
    let path = path.ok_or(MigrateError::MissingArgument("PATH"))?;
    if !ctx.fs.exists(path) {
        return Err(MigrateError::not_found("read", path));
    }

    let artifact = Artifact::load(ctx.fs, path)?;
    let result = unit.run(&artifact, ctx)?;
    if result.content != artifact.content {
        ctx.fs.write(path, &result.content)?;
    }

    ctx.reporter.success(format!(
        "Successfully applied transform \"{}\" to \"{}\"",
        name,
        path.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureClass;
    use crate::testkit::MemoryFileSystem;
    use crate::transforms::test_support::Harness;

    #[test]
    fn in_place_unit_rewrites_file() {
        let h = Harness::new(
            MemoryFileSystem::new().with_file("/site/pages/_meta.js", "export default {}\n"),
        );
        run_transform(&h.ctx(), "migrate-meta-files", Some(Path::new("/site/pages/_meta.js")))
            .unwrap();

        assert_eq!(
            h.fs.content("/site/pages/_meta.js").unwrap(),
            "'use client'\n\nexport default {}\n"
        );
        assert!(h
            .reporter
            .contains("Successfully applied transform \"migrate-meta-files\" to \"/site/pages/_meta.js\""));
    }

    #[test]
    fn non_matching_path_is_left_alone() {
        let h = Harness::new(MemoryFileSystem::new().with_file("/site/README.md", "# Docs\n"));
        run_transform(&h.ctx(), "migrate-meta-files", Some(Path::new("/site/README.md"))).unwrap();
        assert_eq!(h.fs.content("/site/README.md").unwrap(), "# Docs\n");
    }

    #[test]
    fn invocation_errors_touch_nothing() {
        let h = Harness::new(MemoryFileSystem::new().with_file("/site/package.json", "{}"));

        let unknown = run_transform(&h.ctx(), "migrate-all", Some(Path::new("/site"))).unwrap_err();
        assert_eq!(unknown.class(), FailureClass::InvalidInvocation);

        let missing = run_transform(&h.ctx(), "setup-search", None).unwrap_err();
        assert_eq!(missing.class(), FailureClass::InvalidInvocation);
        assert_eq!(h.fs.paths().len(), 1);
    }

    #[test]
    fn missing_path_is_an_error() {
        let h = Harness::new(MemoryFileSystem::new());
        let err = run_transform(&h.ctx(), "backup", Some(Path::new("/site/nope"))).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
