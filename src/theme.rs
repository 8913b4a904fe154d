//! ANSI colors for CLI output.
//!
//! Output is plain when `NO_COLOR` is set or stdout is not a terminal.

/// Terminal colors used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Cyan,
    Gray,
    DarkGray,
}

impl Color {
    fn ansi(self) -> &'static str {
        match self {
            Self::Red => "\x1b[31m",
            Self::Green => "\x1b[32m",
            Self::Yellow => "\x1b[33m",
            Self::Cyan => "\x1b[36m",
            Self::Gray => "\x1b[37m",
            Self::DarkGray => "\x1b[90m",
        }
    }
}

const ANSI_RESET: &str = "\x1b[0m";

/// CLI color theme.
#[derive(Debug, Clone)]
pub struct Theme {
    pub text_primary: Color,
    pub text_secondary: Color,
    pub accent: Color,
    pub warning: Color,
    pub error: Color,
    pub success: Color,
    enabled: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text_primary: Color::Gray,
            text_secondary: Color::DarkGray,
            accent: Color::Cyan,
            warning: Color::Yellow,
            error: Color::Red,
            success: Color::Green,
            enabled: true,
        }
    }
}

impl Theme {
    /// Theme that emits no escape codes.
    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn paint(&self, color: Color, text: &str) -> String {
        if self.enabled {
            format!("{}{}{}", color.ansi(), text, ANSI_RESET)
        } else {
            text.to_string()
        }
    }

    pub fn primary_text(&self, text: &str) -> String {
        self.paint(self.text_primary, text)
    }

    pub fn secondary_text(&self, text: &str) -> String {
        self.paint(self.text_secondary, text)
    }

    pub fn accent_text(&self, text: &str) -> String {
        self.paint(self.accent, text)
    }

    pub fn warning_text(&self, text: &str) -> String {
        self.paint(self.warning, text)
    }

    pub fn error_text(&self, text: &str) -> String {
        self.paint(self.error, text)
    }

    pub fn success_text(&self, text: &str) -> String {
        self.paint(self.success, text)
    }
}

/// Theme for the current process environment.
pub fn current_theme() -> Theme {
    if std::env::var_os("NO_COLOR").is_some() || !atty::is(atty::Stream::Stdout) {
        Theme::plain()
    } else {
        Theme::default()
    }
}
