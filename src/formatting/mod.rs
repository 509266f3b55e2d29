//! Terminal styling for reporter output.

use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,   // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolMode {
    Unicode,
    Ascii,
}

#[derive(Debug, Clone, Copy)]
pub struct FormattingConfig {
    pub color: ColorMode,
    pub symbols: SymbolMode,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            symbols: SymbolMode::Unicode,
        }
    }
}

impl FormattingConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Check NO_COLOR environment variable (per no-color.org standard)
        if env::var("NO_COLOR").is_ok() {
            config.color = ColorMode::Never;
        }

        if env::var("CLICOLOR").is_ok_and(|val| val == "0") {
            config.color = ColorMode::Never;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|val| val == "1") {
            config.color = ColorMode::Always;
        }

        config
    }
}

/// Status glyphs for progress lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Info,
    Success,
    Warning,
    Failure,
    Step,
}

impl Glyph {
    fn render(self, mode: SymbolMode) -> &'static str {
        match (self, mode) {
            (Self::Info, SymbolMode::Unicode) => "ℹ",
            (Self::Success, SymbolMode::Unicode) => "✓",
            (Self::Warning, SymbolMode::Unicode) => "⚠",
            (Self::Failure, SymbolMode::Unicode) => "✗",
            (Self::Step, SymbolMode::Unicode) => "→",
            (Self::Info, SymbolMode::Ascii) => "[INFO]",
            (Self::Success, SymbolMode::Ascii) => "[OK]",
            (Self::Warning, SymbolMode::Ascii) => "[WARN]",
            (Self::Failure, SymbolMode::Ascii) => "[FAIL]",
            (Self::Step, SymbolMode::Ascii) => "->",
        }
    }
}

pub trait OutputFormatter {
    fn success(&self, text: &str) -> String;
    fn error(&self, text: &str) -> String;
    fn warning(&self, text: &str) -> String;
    fn info(&self, text: &str) -> String;
    fn header(&self, text: &str) -> String;
    fn glyph(&self, glyph: Glyph) -> &'static str;
    fn dim(&self, text: &str) -> String;
}

pub struct ColoredFormatter {
    config: FormattingConfig,
    use_color: bool,
}

impl ColoredFormatter {
    pub fn new(config: FormattingConfig) -> Self {
        let use_color = config.color.should_use_color();
        colored::control::set_override(use_color);
        Self { config, use_color }
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.use_color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn success(&self, text: &str) -> String {
        self.paint(text, |t| t.green())
    }

    fn error(&self, text: &str) -> String {
        self.paint(text, |t| t.red())
    }

    fn warning(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow())
    }

    fn info(&self, text: &str) -> String {
        self.paint(text, |t| t.cyan())
    }

    fn header(&self, text: &str) -> String {
        self.paint(text, |t| t.blue().bold())
    }

    fn glyph(&self, glyph: Glyph) -> &'static str {
        glyph.render(self.config.symbols)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed())
    }
}

pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn success(&self, text: &str) -> String {
        text.to_string()
    }

    fn error(&self, text: &str) -> String {
        text.to_string()
    }

    fn warning(&self, text: &str) -> String {
        text.to_string()
    }

    fn info(&self, text: &str) -> String {
        text.to_string()
    }

    fn header(&self, text: &str) -> String {
        text.to_string()
    }

    fn glyph(&self, glyph: Glyph) -> &'static str {
        glyph.render(SymbolMode::Ascii)
    }

    fn dim(&self, text: &str) -> String {
        text.to_string()
    }
}

fn detect_color_support() -> bool {
    // Check if we're in a dumb terminal
    if env::var("TERM").is_ok_and(|term| term == "dumb") {
        return false;
    }

    std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_detects_color_and_uses_unicode() {
        let config = FormattingConfig::default();
        assert_eq!(config.color, ColorMode::Auto);
        assert_eq!(config.symbols, SymbolMode::Unicode);
    }

    #[test]
    fn plain_formatter_uses_ascii_glyphs() {
        let f = PlainFormatter;
        assert_eq!(f.glyph(Glyph::Success), "[OK]");
        assert_eq!(f.glyph(Glyph::Failure), "[FAIL]");
        assert_eq!(f.success("done"), "done");
    }

    #[test]
    fn colored_formatter_without_color_returns_text() {
        let f = ColoredFormatter::new(FormattingConfig {
            color: ColorMode::Never,
            symbols: SymbolMode::Unicode,
        });
        assert_eq!(f.warning("careful"), "careful");
        assert_eq!(f.glyph(Glyph::Warning), "⚠");
    }
}
