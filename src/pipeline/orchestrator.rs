//! Drives a full migration through its states and reports the outcome.

use super::stage::{build_stages, Stage, StageEnv, StageResult, StageStatus};
use super::state::ProjectState;
use crate::io::Prompter;
use crate::manifest::Manifest;
use crate::templates::MIGRATION_GUIDE_URL;
use crate::transforms::TransformContext;

const NEXTRA_MISSING: &str = "Nextra not found in dependencies. Continue anyway?";
const CONFIRM_MODIFY: &str =
    "This will modify your project files. Make sure you have committed or backed up your work. Continue?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// No `package.json` under the project root.
    MissingManifest,
    /// The user answered no to a confirmation prompt.
    Cancelled,
    Fatal { stage: &'static str, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Detecting,
    Confirming,
    Running(usize),
    Completed,
    Aborted(AbortReason),
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub state: PipelineState,
    pub stages: Vec<StageResult>,
}

impl PipelineReport {
    /// `0` on completion or cancellation, `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        match &self.state {
            PipelineState::Completed | PipelineState::Aborted(AbortReason::Cancelled) => 0,
            _ => 1,
        }
    }

    pub fn status_of(&self, name: &str) -> Option<&StageStatus> {
        self.stages
            .iter()
            .find(|result| result.name == name)
            .map(|result| &result.status)
    }
}

pub struct Pipeline<'a> {
    ctx: TransformContext<'a>,
    prompter: &'a dyn Prompter,
    skip_install: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(ctx: TransformContext<'a>, prompter: &'a dyn Prompter) -> Self {
        Self {
            ctx,
            prompter,
            skip_install: false,
        }
    }

    pub fn with_skip_install(mut self, skip_install: bool) -> Self {
        self.skip_install = skip_install;
        self
    }

    pub fn run(&self) -> PipelineReport {
        let reporter = self.ctx.reporter;
        let mut state = PipelineState::Detecting;
        let mut project: Option<ProjectState> = None;
        let mut results = Vec::new();

        while !state.is_terminal() {
            log::debug!("Pipeline state: {:?}", state);
            state = match state {
                PipelineState::Detecting => {
                    let detected = self.detect();
                    let next = if detected.has_manifest {
                        PipelineState::Confirming
                    } else {
                        reporter.error(format!(
                            "No package.json found in {}. Run this command from your project root.",
                            detected.root.display()
                        ));
                        PipelineState::Aborted(AbortReason::MissingManifest)
                    };
                    project = Some(detected);
                    next
                }
                PipelineState::Confirming => match &project {
                    Some(detected) if self.confirmed(detected) => PipelineState::Running(0),
                    Some(_) => {
                        reporter.info("Migration cancelled");
                        PipelineState::Aborted(AbortReason::Cancelled)
                    }
                    None => PipelineState::Detecting,
                },
                PipelineState::Running(_) => match &project {
                    Some(detected) => self.run_stages(detected, &mut results),
                    None => PipelineState::Detecting,
                },
                terminal => terminal,
            };
        }

        let report = PipelineReport {
            state,
            stages: results,
        };
        self.summarize(&report, project.as_ref());
        report
    }

    fn detect(&self) -> ProjectState {
        let reporter = self.ctx.reporter;
        reporter.section("Detecting project structure");
        let project = ProjectState::detect(self.ctx.fs, &self.ctx.options.project_root);

        let found = |present: bool, what: &str| {
            if present {
                reporter.success(format!("Found {}", what));
            } else {
                reporter.info(format!("No {}", what));
            }
        };
        found(project.has_manifest, "package.json");
        found(project.has_legacy_routing, "pages/ directory");
        found(project.has_app_dir, "app/ directory");
        match &project.legacy_config {
            Some(path) => reporter.success(format!("Found {}", self.ctx.display_path(path))),
            None => reporter.info("No theme.config file"),
        }
        project
    }

    fn confirmed(&self, project: &ProjectState) -> bool {
        let declares_nextra = Manifest::load(self.ctx.fs, &project.manifest_path())
            .map(|manifest| manifest.has_dependency("nextra"))
            .unwrap_or_else(|e| {
                log::warn!("{}", e);
                false
            });
        if !declares_nextra && !self.prompter.confirm(NEXTRA_MISSING) {
            return false;
        }
        self.prompter.confirm(CONFIRM_MODIFY)
    }

    /// Run every stage in order. Returns the terminal state.
    fn run_stages(&self, project: &ProjectState, results: &mut Vec<StageResult>) -> PipelineState {
        let env = StageEnv {
            ctx: self.ctx,
            project,
            prompter: self.prompter,
            skip_install: self.skip_install,
        };
        let stages = build_stages(&env);
        let reporter = self.ctx.reporter;

        for (index, stage) in stages.iter().enumerate() {
            log::debug!("Pipeline state: {:?}", PipelineState::Running(index));
            reporter.step(index + 1, stages.len(), stage.name);

            let status = match (stage.run)(&env) {
                Ok(status) => status,
                Err(e) if stage.fatal_on_failure || e.is_fatal() => {
                    reporter.error(format!("{} failed: {}", stage.name, e));
                    results.push(StageResult {
                        name: stage.name,
                        status: StageStatus::Failed(e.to_string()),
                    });
                    print_remediation(self.ctx, &stages);
                    return PipelineState::Aborted(AbortReason::Fatal {
                        stage: stage.name,
                        error: e.to_string(),
                    });
                }
                Err(e) => StageStatus::Failed(e.to_string()),
            };

            match &status {
                StageStatus::Completed => reporter.success(format!("{} done", stage.name)),
                StageStatus::Skipped(reason) => {
                    reporter.info(format!("{} skipped: {}", stage.name, reason))
                }
                StageStatus::Failed(error) => {
                    reporter.warn(format!("{} failed: {}; continuing", stage.name, error))
                }
            }
            results.push(StageResult {
                name: stage.name,
                status,
            });
        }
        PipelineState::Completed
    }

    fn summarize(&self, report: &PipelineReport, project: Option<&ProjectState>) {
        if report.state != PipelineState::Completed {
            return;
        }
        let reporter = self.ctx.reporter;
        reporter.section("Migration summary");
        for result in &report.stages {
            let line = match &result.status {
                StageStatus::Completed => format!("completed: {}", result.name),
                StageStatus::Skipped(reason) => format!("skipped:   {} ({})", result.name, reason),
                StageStatus::Failed(error) => format!("failed:    {} ({})", result.name, error),
            };
            reporter.detail(&line);
        }

        let uses_pnpm = project.is_some_and(|p| self.ctx.fs.exists(&p.root.join("pnpm-lock.yaml")));
        reporter.section("Next steps");
        reporter.detail(if uses_pnpm { "1. Run `pnpm dev`" } else { "1. Run `npm run dev`" });
        reporter.detail("2. Open http://localhost:3000");
        reporter.detail("3. Review the migrated files in app/ and your configuration");
        reporter.detail(&format!("Migration guide: {}", MIGRATION_GUIDE_URL));
    }
}

fn print_remediation(ctx: TransformContext<'_>, stages: &[Stage]) {
    ctx.reporter.section("Run the remaining steps by hand");
    for stage in stages {
        if !stage.manual.is_empty() {
            ctx.reporter.detail(&stage.manual);
        }
    }
    ctx.reporter
        .detail(&format!("Migration guide: {}", MIGRATION_GUIDE_URL));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{AssumeYes, FileSystem};
    use crate::testkit::{MemoryFileSystem, RecordingRunner, ScriptedPrompter};
    use crate::transforms::test_support::Harness;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn v3_site() -> MemoryFileSystem {
        MemoryFileSystem::new()
            .with_file(
                "/site/package.json",
                r#"{"dependencies":{"nextra":"^3.0.0","nextra-theme-docs":"^3.0.0"}}"#,
            )
            .with_file(
                "/site/theme.config.jsx",
                "export default { logo: <span>Docs</span>, footer: { content: 'MIT' } }\n",
            )
            .with_file("/site/pages/index.mdx", "# Home\n")
            .with_file("/site/pages/_meta.js", "export default { index: 'Home' }\n")
    }

    #[test]
    fn full_run_completes_every_stage() {
        let h = Harness::new(v3_site());
        let report = Pipeline::new(h.ctx(), &AssumeYes).run();

        assert_eq!(report.state, PipelineState::Completed);
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.stages.len(), 8);
        assert!(report
            .stages
            .iter()
            .all(|r| r.status == StageStatus::Completed));

        assert!(h.fs.exists(Path::new("/site/pages.bak/index.mdx")));
        assert!(h.fs.exists(Path::new("/site/theme.config.jsx.bak")));
        assert!(h.fs.exists(Path::new("/site/app/layout.jsx")));
        assert!(h.fs.exists(Path::new("/site/app/page.mdx")));
        assert!(!h.fs.exists(Path::new("/site/mdx-components.jsx")));
        assert!(h.fs.exists(Path::new("/site/next.config.mjs")));
        let manifest = h.fs.content("/site/package.json").unwrap();
        assert!(manifest.contains("\"nextra\": \"^4.0.0\""));
        assert!(manifest.contains("\"pagefind\""));
        assert_eq!(h.runner.calls(), vec!["pnpm install"]);
        assert!(h.reporter.contains("npm run dev"));
    }

    #[test]
    fn missing_manifest_aborts_with_exit_one() {
        let h = Harness::new(MemoryFileSystem::new().with_dir("/site"));
        let prompter = ScriptedPrompter::default();
        let report = Pipeline::new(h.ctx(), &prompter).run();

        assert_eq!(report.state, PipelineState::Aborted(AbortReason::MissingManifest));
        assert_eq!(report.exit_code(), 1);
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn declining_is_a_clean_cancel() {
        let h = Harness::new(v3_site());
        let prompter = ScriptedPrompter::new([false]);
        let report = Pipeline::new(h.ctx(), &prompter).run();

        assert_eq!(report.state, PipelineState::Aborted(AbortReason::Cancelled));
        assert_eq!(report.exit_code(), 0);
        assert_eq!(prompter.asked(), vec![CONFIRM_MODIFY]);
        assert!(!h.fs.exists(Path::new("/site/pages.bak")));
    }

    #[test]
    fn missing_nextra_asks_first() {
        let h = Harness::new(MemoryFileSystem::new().with_file("/site/package.json", "{}"));
        let prompter = ScriptedPrompter::new([true, false]);
        let report = Pipeline::new(h.ctx(), &prompter).run();

        assert_eq!(prompter.asked(), vec![NEXTRA_MISSING, CONFIRM_MODIFY]);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn declining_app_overwrite_skips_routing_only() {
        let h = Harness::new(v3_site().with_file("/site/app/page.mdx", "# Kept\n"));
        let prompter = ScriptedPrompter::new([true, false]);
        let report = Pipeline::new(h.ctx(), &prompter)
            .with_skip_install(true)
            .run();

        assert_eq!(report.state, PipelineState::Completed);
        assert!(matches!(
            report.status_of("Migrate pages to app"),
            Some(StageStatus::Skipped(_))
        ));
        assert!(matches!(
            report.status_of("Install dependencies"),
            Some(StageStatus::Skipped(_))
        ));
        assert_eq!(h.fs.content("/site/app/page.mdx").unwrap(), "# Kept\n");
        assert!(h.runner.calls().is_empty());
    }

    #[test]
    fn recoverable_failure_continues() {
        let h = Harness::new(
            v3_site().with_file("/site/package.json", "{ not json"),
        );
        let prompter = ScriptedPrompter::new([true, true]);
        let report = Pipeline::new(h.ctx(), &prompter).run();

        assert_eq!(report.state, PipelineState::Completed);
        assert!(matches!(
            report.status_of("Set up search"),
            Some(StageStatus::Failed(_))
        ));
        assert_eq!(report.status_of("Migrate pages to app"), Some(&StageStatus::Completed));
    }

    #[test]
    fn install_failure_aborts_with_remediation() {
        let mut h = Harness::new(v3_site());
        h.runner = RecordingRunner::new().failing("pnpm").failing("npm");
        let report = Pipeline::new(h.ctx(), &AssumeYes).run();

        assert!(matches!(
            report.state,
            PipelineState::Aborted(AbortReason::Fatal { stage: "Install dependencies", .. })
        ));
        assert_eq!(report.exit_code(), 1);
        assert!(h
            .reporter
            .contains("npx nextra-codemods migrate-theme-config ./theme.config.jsx"));
        assert!(h.reporter.contains("pnpm install || npm install"));
    }

    #[test]
    fn write_failure_is_fatal() {
        let h = Harness::new(v3_site().with_read_only("/site/app"));
        let report = Pipeline::new(h.ctx(), &AssumeYes).run();

        assert!(matches!(
            report.state,
            PipelineState::Aborted(AbortReason::Fatal { stage: "Migrate theme config", .. })
        ));
        assert_eq!(report.stages.len(), 2);
    }
}
