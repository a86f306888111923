//! Storefront color theme.
//!
//! One accent color drives the whole look. Products can override it via an
//! `accent` tag so the storefront retints as you browse.

use ratatui::style::{Color, Modifier, Style};

pub const DEFAULT_ACCENT: Color = Color::Rgb(255, 140, 0);
const HIGHLIGHT_BG: Color = Color::Rgb(60, 60, 60);
const ERROR_FG: Color = Color::Rgb(235, 68, 50);
const MUTED_FG: Color = Color::Rgb(120, 120, 120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: DEFAULT_ACCENT,
        }
    }
}

impl Theme {
    pub fn with_accent(accent: Color) -> Self {
        Self { accent }
    }

    pub fn accent_color(&self) -> Color {
        self.accent
    }

    pub fn base(&self) -> Style {
        Style::default()
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn bold(&self) -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(ERROR_FG)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(MUTED_FG)
    }

    /// Selected row in a menu or list.
    pub fn highlight(&self) -> Style {
        Style::default().bg(HIGHLIGHT_BG).fg(self.accent)
    }

    /// Inverted button label ("subscribe", "press enter").
    pub fn button(&self) -> Style {
        Style::default().bg(self.accent).fg(Color::Black)
    }

    /// Parse a "#RRGGBB" hex color.
    pub fn parse_hex(hex: &str) -> Option<Color> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Theme::parse_hex("#169FC1"), Some(Color::Rgb(22, 159, 193)));
        assert_eq!(Theme::parse_hex("169FC1"), None);
        assert_eq!(Theme::parse_hex("#16"), None);
        assert_eq!(Theme::parse_hex("#16zzzz"), None);
    }
}
