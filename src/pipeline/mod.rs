//! Full interactive migration.
//!
//! `Detecting → Confirming → Running(i) → Completed | Aborted`. Stages run
//! strictly one after another; a recoverable failure skips only its own
//! stage, a fatal one ends the run with the manual commands for every stage.

pub mod orchestrator;
pub mod stage;
pub mod state;

pub use orchestrator::{AbortReason, Pipeline, PipelineReport, PipelineState};
pub use stage::{build_stages, Stage, StageEnv, StageResult, StageStatus};
pub use state::{ProjectState, LEGACY_CONFIG_NAMES};
