//! Test doubles for the I/O seams.
//!
//! - **[`MemoryFileSystem`]**: in-memory [`FileSystem`](crate::io::FileSystem)
//!   with write-failure injection
//! - **[`ScriptedPrompter`]**: answers prompts from a fixed script
//! - **[`RecordingRunner`]**: records external commands and replies with
//!   scripted outcomes
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use nextra_codemods::testkit::MemoryFileSystem;
//!
//! let fs = MemoryFileSystem::new()
//!     .with_file("/site/package.json", r#"{"dependencies":{"nextra":"^3.0.0"}}"#)
//!     .with_file("/site/pages/index.mdx", "# Hello");
//! ```

mod doubles;
mod mock_env;

pub use doubles::{RecordingRunner, ScriptedPrompter};
pub use mock_env::MemoryFileSystem;
