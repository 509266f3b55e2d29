//! Progress lines gathered during a run.
//!
//! Every line is kept in memory with its severity so callers (and tests) can
//! inspect what happened; when the reporter has a formatter the line is also
//! printed immediately.

use crate::formatting::{Glyph, OutputFormatter};
use crate::progress::ProgressConfig;
use indicatif::ProgressBar;
use std::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub severity: Severity,
    pub message: String,
}

pub struct Reporter {
    lines: RefCell<Vec<ReportLine>>,
    formatter: Option<Box<dyn OutputFormatter>>,
    progress: ProgressConfig,
}

impl Reporter {
    /// Reporter that prints as it records.
    pub fn new(formatter: Box<dyn OutputFormatter>, progress: ProgressConfig) -> Self {
        Self {
            lines: RefCell::new(Vec::new()),
            formatter: Some(formatter),
            progress,
        }
    }

    /// Reporter that only records.
    pub fn silent() -> Self {
        Self {
            lines: RefCell::new(Vec::new()),
            formatter: None,
            progress: ProgressConfig::hidden(),
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.record(Severity::Info, message.into());
    }

    pub fn success(&self, message: impl Into<String>) {
        self.record(Severity::Success, message.into());
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.record(Severity::Warn, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.record(Severity::Error, message.into());
    }

    /// A heading line, recorded as info.
    pub fn section(&self, title: &str) {
        self.lines.borrow_mut().push(ReportLine {
            severity: Severity::Info,
            message: title.to_string(),
        });
        if let Some(f) = &self.formatter {
            println!("\n{}", f.header(title));
        }
    }

    /// Numbered stage heading, e.g. `[3/8] Set up search`.
    pub fn step(&self, index: usize, total: usize, title: &str) {
        let message = format!("[{}/{}] {}", index, total, title);
        if let Some(f) = &self.formatter {
            println!("\n{} {}", f.info(f.glyph(Glyph::Step)), f.header(&message));
        }
        self.lines.borrow_mut().push(ReportLine {
            severity: Severity::Info,
            message,
        });
    }

    /// An indented detail line (commands, links), recorded as info.
    pub fn detail(&self, text: &str) {
        self.lines.borrow_mut().push(ReportLine {
            severity: Severity::Info,
            message: text.to_string(),
        });
        if let Some(f) = &self.formatter {
            println!("  {}", f.dim(text));
        }
    }

    pub fn spinner(&self, message: &str) -> ProgressBar {
        self.progress.spinner(message)
    }

    pub fn lines(&self) -> Vec<ReportLine> {
        self.lines.borrow().clone()
    }

    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter(|line| line.severity == severity)
            .map(|line| line.message.clone())
            .collect()
    }

    /// Any recorded line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines
            .borrow()
            .iter()
            .any(|line| line.message.contains(needle))
    }

    fn record(&self, severity: Severity, message: String) {
        log::debug!("{:?}: {}", severity, message);
        if let Some(f) = &self.formatter {
            match severity {
                Severity::Info => println!("{} {}", f.info(f.glyph(Glyph::Info)), message),
                Severity::Success => {
                    println!("{} {}", f.success(f.glyph(Glyph::Success)), message)
                }
                Severity::Warn => {
                    eprintln!("{} {}", f.warning(f.glyph(Glyph::Warning)), f.warning(&message))
                }
                Severity::Error => {
                    eprintln!("{} {}", f.error(f.glyph(Glyph::Failure)), f.error(&message))
                }
            }
        }
        self.lines.borrow_mut().push(ReportLine { severity, message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_lines_in_order_with_severity() {
        let reporter = Reporter::silent();
        reporter.info("Detecting project");
        reporter.warn("No theme config found");
        reporter.success("Updated package.json");

        let lines = reporter.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].severity, Severity::Warn);
        assert_eq!(reporter.messages(Severity::Success), vec!["Updated package.json"]);
        assert!(reporter.contains("theme config"));
    }

    #[test]
    fn silent_reporter_spinners_are_hidden() {
        assert!(Reporter::silent().spinner("Installing").is_hidden());
    }
}
