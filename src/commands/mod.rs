//! Command implementations behind the binary.
//!
//! - **run_transform**: apply one named transform to one path
//! - **migrate**: the full interactive migration
//! - **list**: print the registered transform names

pub mod list;
pub mod migrate;
pub mod run_transform;

pub use list::list_transforms;
pub use migrate::run_migration;
pub use run_transform::run_transform;

use crate::cli::Cli;
use crate::config::{load_config, CodemodConfig};
use crate::formatting::{ColoredFormatter, FormattingConfig, OutputFormatter, PlainFormatter};
use crate::io::{RealFileSystem, SystemCommandRunner};
use crate::progress::ProgressConfig;
use crate::report::Reporter;
use crate::transforms::{TransformContext, TransformOptions};
use anyhow::{Context, Result};
use std::path::PathBuf;

fn formatter(plain: bool) -> Box<dyn OutputFormatter> {
    if plain {
        Box::new(PlainFormatter)
    } else {
        Box::new(ColoredFormatter::new(FormattingConfig::from_env()))
    }
}

fn project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project_root {
        Some(root) => Ok(root.clone()),
        None => std::env::current_dir().context("Failed to determine the current directory"),
    }
}

/// Run whatever `cli` asks for. Returns the process exit code.
pub fn execute(cli: &Cli) -> Result<i32> {
    if cli.list {
        list_transforms();
        return Ok(0);
    }

    let root = project_root(cli)?;
    let fs = RealFileSystem::new();
    let config: CodemodConfig = load_config(&fs, &root).with_overrides(cli.overrides());
    log::debug!("Effective configuration: {:?}", config);

    let reporter = Reporter::new(formatter(cli.plain), ProgressConfig::from_env(cli.quiet));
    let options = TransformOptions::from_config(&root, &config);
    let runner = SystemCommandRunner;
    let ctx = TransformContext {
        fs: &fs,
        runner: &runner,
        reporter: &reporter,
        options: &options,
    };

    match &cli.transform {
        Some(name) => match run_transform(&ctx, name, cli.path.as_deref()) {
            Ok(()) => Ok(0),
            Err(e) => {
                reporter.error(e.to_string());
                Ok(e.exit_code())
            }
        },
        None => Ok(run_migration(ctx, &config).exit_code()),
    }
}
