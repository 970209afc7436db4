//! # Style tokens
//!
//! Terminal styling is expressed as opaque [`Style`] tokens, each one an escape
//! sequence that switches some attribute on. Styled text is built by concatenating the
//! start tokens, the payload and a single [`Style::RESET`].
//!
//! ```rust
//! use robust_input::utils::{Style, apply_style};
//!
//! let text = apply_style("ready", &[Style::GREEN, Style::BOLD]);
//! assert_eq!(text, "\x1b[32m\x1b[1mready\x1b[0m");
//! ```
use std::{borrow::Cow, fmt::Display};

/// An opaque escape sequence controlling text appearance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Style(Cow<'static, str>);

impl Style {
    pub const RESET: Style = Style::from_static("\x1b[0m");

    pub const BOLD: Style = Style::from_static("\x1b[1m");
    pub const DIM: Style = Style::from_static("\x1b[2m");
    pub const ITALIC: Style = Style::from_static("\x1b[3m");
    pub const UNDERLINE: Style = Style::from_static("\x1b[4m");
    pub const INVERTED: Style = Style::from_static("\x1b[7m");

    pub const BLACK: Style = Style::from_static("\x1b[30m");
    pub const RED: Style = Style::from_static("\x1b[31m");
    pub const GREEN: Style = Style::from_static("\x1b[32m");
    pub const YELLOW: Style = Style::from_static("\x1b[33m");
    pub const BLUE: Style = Style::from_static("\x1b[34m");
    pub const MAGENTA: Style = Style::from_static("\x1b[35m");
    pub const CYAN: Style = Style::from_static("\x1b[36m");
    pub const WHITE: Style = Style::from_static("\x1b[37m");

    pub const fn from_static(token: &'static str) -> Self {
        Style(Cow::Borrowed(token))
    }

    /// Wraps an arbitrary escape sequence supplied by the caller.
    pub fn raw(token: impl Into<String>) -> Self {
        Style(Cow::Owned(token.into()))
    }

    /// 256-color foreground (`n` in `0..=255`).
    pub fn color_256(n: u8) -> Self {
        Style::raw(format!("\x1b[38;5;{n}m"))
    }

    /// 256-color background (`n` in `0..=255`).
    pub fn bg_color_256(n: u8) -> Self {
        Style::raw(format!("\x1b[48;5;{n}m"))
    }

    /// True color foreground.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Style::raw(format!("\x1b[38;2;{r};{g};{b}m"))
    }

    /// True color background.
    pub fn rgb_bg(r: u8, g: u8, b: u8) -> Self {
        Style::raw(format!("\x1b[48;2;{r};{g};{b}m"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wraps `text` with the given start tokens and one reset.
/// Without styles the text is returned unchanged.
pub fn apply_style(text: &str, styles: &[Style]) -> String {
    if styles.is_empty() {
        return text.to_string();
    }

    let mut styled = String::with_capacity(
        text.len() + Style::RESET.as_str().len() + styles.iter().map(|s| s.0.len()).sum::<usize>(),
    );
    for style in styles {
        styled.push_str(style.as_str());
    }
    styled.push_str(text);
    styled.push_str(Style::RESET.as_str());
    styled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_style_without_styles_is_identity() {
        assert_eq!(apply_style("plain", &[]), "plain");
    }

    #[test]
    fn test_apply_style_single_reset() {
        let styled = apply_style("x", &[Style::RED, Style::UNDERLINE]);
        assert_eq!(styled, "\x1b[31m\x1b[4mx\x1b[0m");
        assert_eq!(styled.matches("\x1b[0m").count(), 1);
    }

    #[test]
    fn test_color_constructors() {
        assert_eq!(Style::color_256(208).as_str(), "\x1b[38;5;208m");
        assert_eq!(Style::bg_color_256(0).as_str(), "\x1b[48;5;0m");
        assert_eq!(Style::rgb(1, 2, 3).as_str(), "\x1b[38;2;1;2;3m");
        assert_eq!(Style::rgb_bg(255, 0, 10).to_string(), "\x1b[48;2;255;0;10m");
    }
}
