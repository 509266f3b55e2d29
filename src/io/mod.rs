pub mod backup;
pub mod real;
pub mod traits;

// Re-export I/O traits for convenient access
pub use backup::{backup, backup_path};
pub use real::{RealFileSystem, SystemCommandRunner, TerminalPrompter};
pub use traits::{AssumeYes, CommandOutput, CommandRunner, FileSystem, Prompter};
