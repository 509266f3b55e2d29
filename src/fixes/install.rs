//! Dependency installation through the configured package managers.

use crate::errors::{MigrateError, Result};
use crate::transforms::TransformContext;

/// Run `<pm> install` for each configured package manager until one
/// succeeds. Returns the one that did.
///
/// # Errors
///
/// `InstallFailed` (fatal) when every package manager failed.
pub fn install_dependencies(ctx: &TransformContext<'_>) -> Result<String> {
    let mut attempts = Vec::new();

    for manager in &ctx.options.package_managers {
        let spinner = ctx
            .reporter
            .spinner(&format!("Installing dependencies with {}...", manager));
        let outcome = ctx
            .runner
            .run(manager, &["install"], &ctx.options.project_root);
        spinner.finish_and_clear();

        let failure = match outcome {
            Ok(output) if output.success => {
                ctx.reporter
                    .success(format!("Installed dependencies with {}", manager));
                return Ok(manager.clone());
            }
            Ok(output) => output
                .stderr
                .lines()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("exited unsuccessfully")
                .to_string(),
            Err(e) => e.to_string(),
        };

        log::info!("{} install failed: {}", manager, failure);
        ctx.reporter
            .warn(format!("{} install failed: {}", manager, failure));
        attempts.push(format!("{}: {}", manager, failure));
    }

    Err(MigrateError::InstallFailed { attempts })
}
