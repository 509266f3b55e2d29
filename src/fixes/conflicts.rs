//! `pages/` and `app/` cannot coexist in a Nextra 4 site.

use crate::errors::Result;
use crate::io::{backup, backup_path};
use crate::templates::{CONFLICT_LAYOUT, CONFLICT_PAGE, GLOBALS_CSS_BASE};
use crate::transforms::TransformContext;

/// Move `pages/` to `pages.bak/` and make sure `app/` has a root page.
pub fn fix_conflicts(ctx: &TransformContext<'_>) -> Result<()> {
    let pages = ctx.root_path("pages");
    if ctx.fs.is_dir(&pages) {
        let stale = backup_path(&pages);
        if ctx.fs.is_dir(&stale) {
            ctx.fs.remove_dir_all(&stale)?;
        }
        backup(ctx.fs, &pages)?;
        ctx.fs.remove_dir_all(&pages)?;
        ctx.reporter.success("Moved pages/ to pages.bak/");
    } else {
        ctx.reporter.info("No pages/ directory to remove");
    }

    let app = ctx.root_path("app");
    if !ctx.fs.is_dir(&app) {
        for (name, content) in [
            ("page.tsx", CONFLICT_PAGE),
            ("layout.tsx", CONFLICT_LAYOUT),
            ("globals.css", GLOBALS_CSS_BASE),
        ] {
            ctx.fs.write_with_parents(&app.join(name), content)?;
        }
        ctx.reporter.success("Created a minimal app/ directory");
    }
    Ok(())
}
