//! The fixed stage list of a full migration.

use super::state::ProjectState;
use crate::errors::Result;
use crate::fixes::{fix_all_styles, install_dependencies, update_dependencies};
use crate::io::{backup, Prompter};
use crate::transforms::next_config::UpdateNextConfig;
use crate::transforms::pages_to_app::MigratePagesToApp;
use crate::transforms::setup_search::SetupSearch;
use crate::transforms::theme_config::MigrateThemeConfig;
use crate::transforms::{Artifact, Transform, TransformContext};
use std::path::Path;

/// Everything a stage operation may use.
pub struct StageEnv<'a> {
    pub ctx: TransformContext<'a>,
    pub project: &'a ProjectState,
    pub prompter: &'a dyn Prompter,
    pub skip_install: bool,
}

pub type StageOp = fn(&StageEnv<'_>) -> Result<StageStatus>;

pub struct Stage {
    pub name: &'static str,
    /// Shell command that performs this stage by hand.
    pub manual: String,
    /// Any failure of this stage aborts the run.
    pub fatal_on_failure: bool,
    pub run: StageOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageStatus {
    Completed,
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageResult {
    pub name: &'static str,
    pub status: StageStatus,
}

const CLI: &str = "npx nextra-codemods";

fn relative(project: &ProjectState, path: &Path) -> String {
    match path.strip_prefix(&project.root) {
        Ok(rel) => format!("./{}", rel.display()),
        Err(_) => path.display().to_string(),
    }
}

/// Stages in run order, with manual commands for `project`.
pub fn build_stages(env: &StageEnv<'_>) -> Vec<Stage> {
    let project = env.project;
    let options = env.ctx.options;

    let backups = project
        .backup_targets(env.ctx.fs)
        .iter()
        .map(|path| format!("{} backup {}", CLI, relative(project, path)))
        .collect::<Vec<_>>()
        .join(" && ");
    let theme_config = project
        .legacy_config
        .as_deref()
        .map_or_else(|| "./theme.config.jsx".to_string(), |p| relative(project, p));
    let auto_rename = if options.auto_rename { " --auto-rename" } else { "" };
    let install = options
        .package_managers
        .iter()
        .map(|pm| format!("{} install", pm))
        .collect::<Vec<_>>()
        .join(" || ");

    vec![
        Stage {
            name: "Back up project files",
            manual: backups,
            fatal_on_failure: true,
            run: backup_stage,
        },
        Stage {
            name: "Migrate theme config",
            manual: format!("{} migrate-theme-config {}", CLI, theme_config),
            fatal_on_failure: false,
            run: theme_config_stage,
        },
        Stage {
            name: "Migrate pages to app",
            manual: format!("{} migrate-pages-to-app ./pages{}", CLI, auto_rename),
            fatal_on_failure: false,
            run: routing_stage,
        },
        Stage {
            name: "Set up search",
            manual: format!("{} setup-search ./package.json", CLI),
            fatal_on_failure: false,
            run: search_stage,
        },
        Stage {
            name: "Update next config",
            manual: format!(
                "{} update-next-config {}",
                CLI,
                relative(project, &project.next_config_target())
            ),
            fatal_on_failure: false,
            run: next_config_stage,
        },
        Stage {
            name: "Set up styles",
            manual: format!("{} fix-all-styles .", CLI),
            fatal_on_failure: false,
            run: styles_stage,
        },
        Stage {
            name: "Update dependencies",
            manual: format!("{} update-dependencies ./package.json", CLI),
            fatal_on_failure: false,
            run: dependencies_stage,
        },
        Stage {
            name: "Install dependencies",
            manual: install,
            fatal_on_failure: true,
            run: install_stage,
        },
    ]
}

fn run_unit(unit: &dyn Transform, env: &StageEnv<'_>, path: &Path) -> Result<StageStatus> {
    let artifact = Artifact::load(env.ctx.fs, path)?;
    unit.run(&artifact, &env.ctx)?;
    Ok(StageStatus::Completed)
}

fn backup_stage(env: &StageEnv<'_>) -> Result<StageStatus> {
    for target in env.project.backup_targets(env.ctx.fs) {
        let saved = backup(env.ctx.fs, &target)?;
        env.ctx.reporter.success(format!(
            "Backed up {} to {}",
            env.ctx.display_path(&target),
            env.ctx.display_path(&saved)
        ));
    }
    Ok(StageStatus::Completed)
}

fn theme_config_stage(env: &StageEnv<'_>) -> Result<StageStatus> {
    match env.project.legacy_config.as_deref() {
        Some(path) => run_unit(&MigrateThemeConfig, env, path),
        None => Ok(StageStatus::Skipped("no theme.config file found".into())),
    }
}

fn routing_stage(env: &StageEnv<'_>) -> Result<StageStatus> {
    if !env.project.has_legacy_routing {
        return Ok(StageStatus::Skipped("no pages/ directory found".into()));
    }
    if env.project.has_app_dir && !env.prompter.confirm("App directory already exists. Overwrite?") {
        return Ok(StageStatus::Skipped("kept the existing app/ directory".into()));
    }
    run_unit(&MigratePagesToApp, env, &env.project.pages_dir())
}

fn search_stage(env: &StageEnv<'_>) -> Result<StageStatus> {
    run_unit(&SetupSearch, env, &env.project.manifest_path())
}

fn next_config_stage(env: &StageEnv<'_>) -> Result<StageStatus> {
    run_unit(&UpdateNextConfig, env, &env.project.next_config_target())
}

fn styles_stage(env: &StageEnv<'_>) -> Result<StageStatus> {
    fix_all_styles(&env.ctx)?;
    Ok(StageStatus::Completed)
}

fn dependencies_stage(env: &StageEnv<'_>) -> Result<StageStatus> {
    update_dependencies(&env.ctx)?;
    Ok(StageStatus::Completed)
}

fn install_stage(env: &StageEnv<'_>) -> Result<StageStatus> {
    if env.skip_install {
        return Ok(StageStatus::Skipped("--skip-install".into()));
    }
    install_dependencies(&env.ctx)?;
    Ok(StageStatus::Completed)
}
