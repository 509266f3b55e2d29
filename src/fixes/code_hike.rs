//! Project-wide Code Hike setup.
//!
//! Where `setup-code-hike` edits the one file it is given, this covers the
//! whole project: dependency and install, the Next.js config, the
//! components hook, the stylesheet and an example page.

use super::install::install_dependencies;
use crate::errors::Result;
use crate::io::FileSystem;
use crate::manifest::MANIFEST_FILE;
use crate::templates::{
    self, ThemePackage, CODE_HIKE_EXAMPLE_PAGE, CODE_HIKE_NEXTRA_OPTIONS, DEFAULT_NEXT_OPTIONS,
};
use crate::transforms::code_hike::{
    add_dependency, add_stylesheet, register_component, CODE_HIKE_IMPORT, CODE_HIKE_PACKAGE,
    CODE_HIKE_VERSION,
};
use crate::transforms::next_config::{config_options, find_next_config, module_kind};
use crate::transforms::TransformContext;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

const COMPONENTS_NAMES: [&str; 4] = [
    "mdx-components.tsx",
    "mdx-components.jsx",
    "mdx-components.ts",
    "mdx-components.js",
];

const EXAMPLE_PAGE: &str = "app/examples/code-hike.mdx";

static EXAMPLES_ENTRY: Lazy<Regex> = Lazy::new(|| Regex::new(r"examples:\s*\{([^}]*)\}").unwrap());

/// Where the config is saved before the Code Hike rewrite.
pub fn code_hike_backup_path(config: &Path) -> PathBuf {
    let mut name = config.as_os_str().to_os_string();
    name.push(".codehike.bak");
    PathBuf::from(name)
}

pub fn fix_code_hike(ctx: &TransformContext<'_>) -> Result<()> {
    let fs = ctx.fs;

    let manifest = ctx.root_path(MANIFEST_FILE);
    if fs.is_file(&manifest) {
        if rewrite(fs, &manifest, |source| add_dependency(source, &manifest))? {
            ctx.reporter.success(format!(
                "Added {}@{} to dependencies",
                CODE_HIKE_PACKAGE, CODE_HIKE_VERSION
            ));
        }
        if let Err(e) = install_dependencies(ctx) {
            ctx.reporter
                .warn(format!("{}; install the dependencies yourself", e));
        }
    }

    if let Some(config) = find_next_config(fs, &ctx.options.project_root) {
        let source = fs.read_to_string(&config)?;
        let saved = code_hike_backup_path(&config);
        fs.copy_file(&config, &saved)?;
        ctx.reporter
            .info(format!("Backed up {} to {}", ctx.display_path(&config), ctx.display_path(&saved)));

        let next = config_options(&source, &config)?.next;
        let updated = templates::next_config(
            module_kind(&config, &source),
            CODE_HIKE_NEXTRA_OPTIONS,
            next.as_deref().unwrap_or(DEFAULT_NEXT_OPTIONS),
        );
        fs.write(&config, &updated)?;
        ctx.reporter
            .success(format!("Updated {} for Code Hike", ctx.display_path(&config)));
    }

    let existing = COMPONENTS_NAMES
        .iter()
        .map(|name| ctx.root_path(name))
        .find(|path| fs.is_file(path));
    match existing {
        Some(path) => {
            if rewrite(fs, &path, |source| register_component(source, &path))? {
                ctx.reporter
                    .success(format!("Registered CH in {}", ctx.display_path(&path)));
            }
        }
        None => {
            let path = ctx.root_path("mdx-components.jsx");
            let content = templates::mdx_components(
                ThemePackage::Docs,
                &[CODE_HIKE_IMPORT.to_string()],
                "{\n  CH\n}",
            );
            fs.write(&path, &content)?;
            ctx.reporter
                .success(format!("Created {}", ctx.display_path(&path)));
        }
    }

    if !fs.is_dir(&ctx.root_path("app")) {
        log::info!("No app/ directory; skipping Code Hike styles and example page");
        return Ok(());
    }

    let globals = ctx.root_path("app/globals.css");
    if fs.is_file(&globals) && rewrite(fs, &globals, |source| Ok(add_stylesheet(source)))? {
        ctx.reporter.success("Added Code Hike styles to app/globals.css");
    }

    if fs.write_if_absent(&ctx.root_path(EXAMPLE_PAGE), CODE_HIKE_EXAMPLE_PAGE)? {
        ctx.reporter.success(format!("Created {}", EXAMPLE_PAGE));
    }

    let meta = ctx.root_path("app/_meta.js");
    if fs.is_file(&meta) && rewrite(fs, &meta, |source| Ok(add_example_entry(source)))? {
        ctx.reporter.success("Listed the Code Hike example in app/_meta.js");
    }
    Ok(())
}

/// Add `'code-hike'` to an inline `examples: { ... }` section.
pub fn add_example_entry(source: &str) -> String {
    if source.contains("code-hike") {
        return source.to_string();
    }
    EXAMPLES_ENTRY
        .replacen(source, 1, "examples: {${1}  'code-hike': 'Code Hike',\n}")
        .into_owned()
}

/// Apply `change` to the file at `path`. Writes and returns `true` only when
/// the content changed.
fn rewrite(
    fs: &dyn FileSystem,
    path: &Path,
    change: impl FnOnce(&str) -> Result<String>,
) -> Result<bool> {
    let source = fs.read_to_string(path)?;
    let updated = change(&source)?;
    if updated == source {
        return Ok(false);
    }
    fs.write(path, &updated)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{MemoryFileSystem, RecordingRunner};
    use crate::transforms::test_support::Harness;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn v3_site() -> MemoryFileSystem {
        MemoryFileSystem::new()
            .with_file("/site/package.json", r#"{"dependencies":{"nextra":"^4.0.0"}}"#)
            .with_file(
                "/site/next.config.mjs",
                indoc! {"
                    import nextra from 'nextra'

                    const withNextra = nextra({})

                    export default withNextra({ output: 'export' })
                "},
            )
            .with_file("/site/app/globals.css", "@tailwind base;\n")
            .with_file("/site/app/_meta.js", "export default {\n  examples: {\n    basic: 'Basic',\n  }\n}\n")
    }

    #[test]
    fn sets_up_the_whole_project() {
        let h = Harness::new(v3_site());
        fix_code_hike(&h.ctx()).unwrap();

        assert!(h
            .fs
            .content("/site/package.json")
            .unwrap()
            .contains("\"@code-hike/mdx\": \"^0.9.0\""));
        assert_eq!(h.runner.calls(), vec!["pnpm install"]);

        let config = h.fs.content("/site/next.config.mjs").unwrap();
        assert!(config.starts_with("import nextra from 'nextra'"));
        assert!(config.contains("rehypePlugins: []"));
        assert!(config.contains("export default withNextra({ output: 'export' })"));
        assert!(h
            .fs
            .content("/site/next.config.mjs.codehike.bak")
            .unwrap()
            .contains("nextra({})"));

        let components = h.fs.content("/site/mdx-components.jsx").unwrap();
        assert!(components.contains(CODE_HIKE_IMPORT));
        assert!(components.contains("CH"));

        assert!(h
            .fs
            .content("/site/app/globals.css")
            .unwrap()
            .starts_with("@import '@code-hike/mdx/styles.css';"));
        assert!(h.fs.content("/site/app/examples/code-hike.mdx").is_some());
        assert!(h
            .fs
            .content("/site/app/_meta.js")
            .unwrap()
            .contains("'code-hike': 'Code Hike'"));
    }

    #[test]
    fn existing_components_file_gets_ch_registered() {
        let fs = v3_site().with_file(
            "/site/mdx-components.tsx",
            "export function useMDXComponents(components) {\n  return { ...components }\n}\n",
        );
        let h = Harness::new(fs);
        fix_code_hike(&h.ctx()).unwrap();

        let components = h.fs.content("/site/mdx-components.tsx").unwrap();
        assert!(components.contains("return { CH, ...components }"));
        assert!(h.fs.content("/site/mdx-components.jsx").is_none());
    }

    #[test]
    fn failed_install_only_warns() {
        let mut h = Harness::new(v3_site());
        h.runner = RecordingRunner::new().failing("pnpm").failing("npm");
        fix_code_hike(&h.ctx()).unwrap();
        assert!(h.reporter.contains("install the dependencies yourself"));
        assert!(h.fs.content("/site/app/examples/code-hike.mdx").is_some());
    }

    #[test]
    fn without_app_dir_stops_after_components() {
        let h = Harness::new(
            MemoryFileSystem::new().with_file("/site/next.config.js", "module.exports = {}\n"),
        );
        fix_code_hike(&h.ctx()).unwrap();

        let config = h.fs.content("/site/next.config.js").unwrap();
        assert!(config.starts_with("const nextra = require('nextra')"));
        assert!(h.fs.content("/site/mdx-components.jsx").is_some());
        assert!(h.fs.content("/site/app/examples/code-hike.mdx").is_none());
        assert!(h.runner.calls().is_empty());
    }

    #[test]
    fn example_entry_added_once() {
        let once = add_example_entry("export default { examples: { a: 'A', } }");
        assert_eq!(once, "export default { examples: { a: 'A',   'code-hike': 'Code Hike',\n} }");
        assert_eq!(add_example_entry(&once), once);
        assert_eq!(add_example_entry("export default {}"), "export default {}");
    }

    #[test]
    fn backup_sits_next_to_config() {
        assert_eq!(
            code_hike_backup_path(Path::new("/site/next.config.js")),
            PathBuf::from("/site/next.config.js.codehike.bak")
        );
    }
}
