//! Styled console lines with optional ANSI colors

use colored::*;

/// Colors for each role a console line can take
#[derive(Debug, Clone)]
struct ColorScheme {
    header: Color,
    error: Color,
    info: Color,
    highlight: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            error: Color::Red,
            info: Color::Cyan,
            highlight: Color::Magenta,
        }
    }
}

/// Renders text with a role style; plain text when colors are off
#[derive(Debug, Clone)]
pub struct Presenter {
    enable_color: bool,
    color_scheme: ColorScheme,
}

impl Presenter {
    pub fn new(enable_color: bool) -> Self {
        Self {
            enable_color,
            color_scheme: ColorScheme::default(),
        }
    }

    /// Presenter that never emits escape sequences
    pub fn plain() -> Self {
        Self::new(false)
    }

    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    fn emphasize(&self, text: &str, color: Color) -> String {
        if self.enable_color {
            text.color(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Section titles, bold
    pub fn header(&self, text: &str) -> String {
        self.emphasize(text, self.color_scheme.header)
    }

    pub fn info(&self, text: &str) -> String {
        self.colorize(text, self.color_scheme.info).to_string()
    }

    /// Command names in the help listing, bold
    pub fn highlight(&self, text: &str) -> String {
        self.emphasize(text, self.color_scheme.highlight)
    }

    pub fn error(&self, text: &str) -> String {
        self.colorize(text, self.color_scheme.error).to_string()
    }

    /// `[ERROR] message` line used for command-level failures
    pub fn error_line(&self, message: &str) -> String {
        format!("{} {}", self.error("[ERROR]"), message)
    }

    /// `[INFO] message` line used for notices
    pub fn info_line(&self, message: &str) -> String {
        format!("{} {}", self.info("[INFO]"), message)
    }
}
