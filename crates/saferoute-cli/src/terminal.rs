//! Terminal styling and color utilities.
//!
//! ANSI escape code definitions plus color detection, so text output can
//! highlight unsafe segments without breaking pipes or dumb terminals.

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";
    /// Bright bold white for headings.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for secondary details.
    pub const GRAY: &str = "\x1b[90m";
    /// Green for well-rated segments.
    pub const GREEN: &str = "\x1b[32m";
    /// Orange (256-color) for middling segments.
    pub const ORANGE: &str = "\x1b[38;5;208m";
    /// Red for poorly rated segments.
    pub const RED: &str = "\x1b[31m";
}

/// Resolved color codes, either ANSI sequences or empty strings when color
/// is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub green: &'static str,
    pub orange: &'static str,
    pub red: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            green: colors::GREEN,
            orange: colors::ORANGE,
            red: colors::RED,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            white_bold: "",
            gray: "",
            green: "",
            orange: "",
            red: "",
        }
    }

    /// `colored()` when the terminal supports ANSI colors, `plain()` otherwise.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    /// Color for a 0-100 safety score.
    #[must_use]
    pub fn for_safety(&self, score: f64) -> &'static str {
        if score >= 70.0 {
            self.green
        } else if score >= 40.0 {
            self.orange
        } else {
            self.red
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if stdout should receive ANSI color codes.
///
/// Respects `NO_COLOR` (https://no-color.org/), `TERM=dumb`, and disables
/// color when stdout is not a terminal.
#[must_use]
pub fn supports_color() -> bool {
    use std::io::IsTerminal;

    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_palette_is_empty() {
        let palette = ColorPalette::plain();
        assert_eq!(palette.reset, "");
        assert_eq!(palette.for_safety(10.0), "");
    }

    #[test]
    fn safety_bands() {
        let palette = ColorPalette::colored();
        assert_eq!(palette.for_safety(95.0), colors::GREEN);
        assert_eq!(palette.for_safety(70.0), colors::GREEN);
        assert_eq!(palette.for_safety(55.0), colors::ORANGE);
        assert_eq!(palette.for_safety(39.9), colors::RED);
    }
}
