//! Indigo & Violet color palettes for the MetroDoc TUI.
//!
//! Two palettes back the persisted `theme` preference. Views receive a
//! `&Palette` and use its style helpers instead of inline `Color::*`
//! literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

use crate::core::prefs::Theme;

/// Resolved color set for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Indigo - primary accent, active items, focused borders.
    pub primary: Color,
    /// Violet - calls to action, important items.
    pub accent: Color,
    /// Base background.
    pub bg_base: Color,
    /// Elevated panels.
    pub bg_surface: Color,
    /// Primary text.
    pub text: Color,
    /// Secondary labels, unfocused borders.
    pub text_muted: Color,
    /// Disabled items, faint hints.
    pub text_dim: Color,
    /// Destructive actions, failures.
    pub error: Color,
    /// Confirmations.
    pub success: Color,
    /// Alerts.
    pub warning: Color,
    /// Informational highlights.
    pub info: Color,
}

const DARK: Palette = Palette {
    primary: Color::Rgb(0x63, 0x66, 0xF1),
    accent: Color::Rgb(0x8B, 0x5C, 0xF6),
    bg_base: Color::Rgb(0x11, 0x11, 0x1B),
    bg_surface: Color::Rgb(0x1C, 0x1C, 0x2E),
    text: Color::Rgb(0xE0, 0xE0, 0xE8),
    text_muted: Color::Rgb(0x80, 0x80, 0x90),
    text_dim: Color::Rgb(0x50, 0x50, 0x60),
    error: Color::Rgb(0xEF, 0x53, 0x50),
    success: Color::Rgb(0x66, 0xBB, 0x6A),
    warning: Color::Rgb(0xFF, 0xA7, 0x26),
    info: Color::Rgb(0x42, 0xA5, 0xF5),
};

const LIGHT: Palette = Palette {
    primary: Color::Rgb(0x43, 0x38, 0xCA),
    accent: Color::Rgb(0x6D, 0x28, 0xD9),
    bg_base: Color::Rgb(0xF5, 0xF5, 0xFA),
    bg_surface: Color::Rgb(0xEA, 0xEA, 0xF2),
    text: Color::Rgb(0x20, 0x20, 0x30),
    text_muted: Color::Rgb(0x60, 0x60, 0x70),
    text_dim: Color::Rgb(0xA0, 0xA0, 0xB0),
    error: Color::Rgb(0xC6, 0x28, 0x28),
    success: Color::Rgb(0x2E, 0x7D, 0x32),
    warning: Color::Rgb(0xE6, 0x51, 0x00),
    info: Color::Rgb(0x15, 0x65, 0xC0),
};

/// Palette for the active theme preference.
pub fn palette(theme: Theme) -> &'static Palette {
    match theme {
        Theme::Dark => &DARK,
        Theme::Light => &LIGHT,
    }
}

impl Palette {
    /// Accent-colored bold text (titles, active items).
    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Section header style.
    pub fn heading(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    /// Focused border style.
    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.primary)
    }

    /// Unfocused border style.
    pub fn border_default(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    /// Highlighted/selected item.
    pub fn highlight(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Muted label text.
    pub fn muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Dim text for disabled/faint items.
    pub fn dim(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    /// Key hint style (e.g., "[q]:quit").
    pub fn key_hint(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    /// Status bar brand badge.
    pub fn brand_badge(&self) -> Style {
        Style::default()
            .fg(self.bg_base)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Insert mode badge.
    pub fn insert_badge(&self) -> Style {
        Style::default()
            .fg(self.bg_base)
            .bg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// A bordered block with focused styling.
    pub fn block_focused<'a>(&self, title: &'a str) -> Block<'a> {
        Block::default()
            .title(format!(" {title} "))
            .borders(Borders::ALL)
            .border_style(self.border_focused())
    }

    /// A bordered block with default (unfocused) styling.
    pub fn block_default<'a>(&self, title: &'a str) -> Block<'a> {
        Block::default()
            .title(format!(" {title} "))
            .borders(Borders::ALL)
            .border_style(self.border_default())
    }

    /// Pick focused or default block styling.
    pub fn block<'a>(&self, title: &'a str, focused: bool) -> Block<'a> {
        if focused {
            self.block_focused(title)
        } else {
            self.block_default(title)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palettes_differ() {
        assert_ne!(palette(Theme::Dark), palette(Theme::Light));
    }

    #[test]
    fn test_style_helpers_return_non_default() {
        let pal = palette(Theme::Dark);
        assert_ne!(pal.title(), Style::default());
        assert_ne!(pal.heading(), Style::default());
        assert_ne!(pal.highlight(), Style::default());
        assert_ne!(pal.muted(), Style::default());
    }
}
