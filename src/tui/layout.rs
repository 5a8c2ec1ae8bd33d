//! Root layout computation for the notebook screen's three panes.

use ratatui::layout::{Constraint, Layout, Rect};

/// Width of the expanded sources panel.
pub const SOURCES_EXPANDED_WIDTH: u16 = 34;
/// Width of the expanded studio panel.
pub const STUDIO_EXPANDED_WIDTH: u16 = 26;
/// Width of a collapsed side panel (single-column strip).
pub const PANEL_COLLAPSED_WIDTH: u16 = 3;
/// Auto-collapse side panels below this terminal width.
pub const AUTO_COLLAPSE_THRESHOLD: u16 = 90;
/// Hide side panels entirely below this terminal width.
pub const HIDE_PANELS_THRESHOLD: u16 = 40;

/// Computed regions for a single frame.
pub struct AppLayout {
    /// Header row (brand, notebook title, selection summary).
    pub header: Rect,
    /// Content area between header and status bar.
    pub content: Rect,
    /// Status bar (bottom row).
    pub status: Rect,
}

impl AppLayout {
    pub fn compute(area: Rect) -> Self {
        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);
        AppLayout {
            header: rows[0],
            content: rows[1],
            status: rows[2],
        }
    }
}

/// Side panel visibility derived from terminal width and user preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelVisibility {
    Expanded,
    Collapsed,
    Hidden,
}

impl PanelVisibility {
    fn derive(area_width: u16, user_collapsed: bool) -> Self {
        if area_width < HIDE_PANELS_THRESHOLD {
            PanelVisibility::Hidden
        } else if user_collapsed || area_width < AUTO_COLLAPSE_THRESHOLD {
            PanelVisibility::Collapsed
        } else {
            PanelVisibility::Expanded
        }
    }

    fn width(self, expanded: u16) -> Option<u16> {
        match self {
            PanelVisibility::Expanded => Some(expanded),
            PanelVisibility::Collapsed => Some(PANEL_COLLAPSED_WIDTH),
            PanelVisibility::Hidden => None,
        }
    }
}

/// Pane regions of the notebook screen: sources | chat | studio.
pub struct PanelLayout {
    pub sources: Option<Rect>,
    pub chat: Rect,
    pub studio: Option<Rect>,
    pub sources_visibility: PanelVisibility,
    pub studio_visibility: PanelVisibility,
}

impl PanelLayout {
    /// Compute pane regions from the content area and the persisted
    /// collapse preferences.
    pub fn compute(content: Rect, sources_collapsed: bool, studio_collapsed: bool) -> Self {
        let sources_visibility = PanelVisibility::derive(content.width, sources_collapsed);
        let studio_visibility = PanelVisibility::derive(content.width, studio_collapsed);

        let sources_width = sources_visibility.width(SOURCES_EXPANDED_WIDTH);
        let studio_width = studio_visibility.width(STUDIO_EXPANDED_WIDTH);

        let mut constraints = Vec::with_capacity(3);
        if let Some(w) = sources_width {
            constraints.push(Constraint::Length(w));
        }
        constraints.push(Constraint::Min(1));
        if let Some(w) = studio_width {
            constraints.push(Constraint::Length(w));
        }

        let cols = Layout::horizontal(constraints).split(content);

        let mut idx = 0;
        let sources = sources_width.map(|_| {
            let rect = cols[idx];
            idx += 1;
            rect
        });
        let chat = cols[idx];
        idx += 1;
        let studio = studio_width.map(|_| cols[idx]);

        PanelLayout {
            sources,
            chat,
            studio,
            sources_visibility,
            studio_visibility,
        }
    }
}

/// Fixed-size rect centered in `area`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_clamps() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = centered_rect(60, 30, area);
        assert_eq!(rect, area);
    }

    #[test]
    fn test_wide_terminal_expands_both() {
        let layout = PanelLayout::compute(Rect::new(0, 0, 120, 40), false, false);
        assert_eq!(layout.sources_visibility, PanelVisibility::Expanded);
        assert_eq!(layout.studio_visibility, PanelVisibility::Expanded);
        assert_eq!(layout.sources.unwrap().width, SOURCES_EXPANDED_WIDTH);
        assert_eq!(layout.studio.unwrap().width, STUDIO_EXPANDED_WIDTH);
    }

    #[test]
    fn test_user_collapse_sources_only() {
        let layout = PanelLayout::compute(Rect::new(0, 0, 120, 40), true, false);
        assert_eq!(layout.sources.unwrap().width, PANEL_COLLAPSED_WIDTH);
        assert_eq!(layout.studio.unwrap().width, STUDIO_EXPANDED_WIDTH);
    }

    #[test]
    fn test_auto_collapse_narrow() {
        let layout = PanelLayout::compute(Rect::new(0, 0, 80, 40), false, false);
        assert_eq!(layout.sources_visibility, PanelVisibility::Collapsed);
        assert_eq!(layout.studio_visibility, PanelVisibility::Collapsed);
    }

    #[test]
    fn test_hidden_very_narrow() {
        let layout = PanelLayout::compute(Rect::new(0, 0, 30, 40), false, false);
        assert!(layout.sources.is_none());
        assert!(layout.studio.is_none());
        assert_eq!(layout.chat.width, 30);
    }

    #[test]
    fn test_panes_fill_width() {
        let layout = PanelLayout::compute(Rect::new(0, 0, 100, 30), false, true);
        let sources_w = layout.sources.map(|r| r.width).unwrap_or(0);
        let studio_w = layout.studio.map(|r| r.width).unwrap_or(0);
        assert_eq!(sources_w + layout.chat.width + studio_w, 100);
    }

    #[test]
    fn test_app_layout_rows() {
        let layout = AppLayout::compute(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.content.height, 22);
    }
}
