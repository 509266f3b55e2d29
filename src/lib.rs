//! Codemods that migrate a Nextra 3 documentation site to Nextra 4.
//!
//! Each migration step is a [`Transform`] registered by name; the
//! [`pipeline`] runs the standard sequence of them against a whole project.

// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod fixes;
pub mod formatting;
pub mod io;
pub mod manifest;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod syntax;
pub mod templates;
pub mod testkit;
pub mod transforms;

// Re-export commonly used types
pub use crate::config::{load_config, CodemodConfig};
pub use crate::errors::{FailureClass, MigrateError, Result};
pub use crate::io::{backup, CommandRunner, FileSystem, Prompter};
pub use crate::manifest::Manifest;
pub use crate::pipeline::{Pipeline, PipelineReport, PipelineState, ProjectState};
pub use crate::report::{Reporter, Severity};
pub use crate::transforms::{
    available_transforms, registry, Artifact, Transform, TransformContext, TransformOptions,
};
