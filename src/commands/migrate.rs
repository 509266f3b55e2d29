use crate::config::CodemodConfig;
use crate::io::{AssumeYes, Prompter, TerminalPrompter};
use crate::pipeline::{Pipeline, PipelineReport};
use crate::transforms::TransformContext;

/// Full migration of the project at `ctx`'s root.
pub fn run_migration(ctx: TransformContext<'_>, config: &CodemodConfig) -> PipelineReport {
    let prompter: Box<dyn Prompter> = if config.migration.assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalPrompter)
    };
    ctx.reporter.section("Nextra 3 to 4 migration");
    Pipeline::new(ctx, prompter.as_ref())
        .with_skip_install(config.install.skip)
        .run()
}
