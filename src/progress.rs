//! Spinners for long-running external commands.
//!
//! - **Quiet Mode**: no spinner (respects `NEXTRA_CODEMODS_QUIET` and `--quiet`)
//! - **Non-TTY**: spinners are hidden in CI and piped output

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub const TEMPLATE_SPINNER: &str = "{spinner} {msg} ({elapsed})";

/// Configuration for progress display behavior
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressConfig {
    /// Whether to suppress all progress output
    pub quiet_mode: bool,
}

impl ProgressConfig {
    /// Create progress configuration from environment and CLI arguments
    pub fn from_env(quiet: bool) -> Self {
        let env_quiet = std::env::var("NEXTRA_CODEMODS_QUIET").is_ok();
        Self {
            quiet_mode: quiet || env_quiet,
        }
    }

    /// Never shows anything; used by tests and library callers.
    pub fn hidden() -> Self {
        Self { quiet_mode: true }
    }

    /// Determine if spinners should be displayed
    pub fn should_show_progress(&self) -> bool {
        if self.quiet_mode {
            return false;
        }

        use std::io::IsTerminal;
        std::io::stderr().is_terminal()
    }

    /// Create a ticking spinner, or a hidden one when progress is off.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if !self.should_show_progress() {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template(TEMPLATE_SPINNER) {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}
