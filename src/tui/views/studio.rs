//! Studio panel - generation tools, none of which are wired up.
//!
//! Mirrors the demo backend: every tool is a placeholder that raises a
//! "coming soon" notification when activated.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::events::NotificationLevel;
use crate::tui::layout::PanelVisibility;
use crate::tui::services::Services;
use crate::tui::theme::Palette;

/// Placeholder tool entries, in display order.
pub const STUDIO_TOOLS: [&str; 6] = [
    "Audio Overview",
    "Study Guide",
    "Briefing Doc",
    "FAQ",
    "Timeline",
    "Add note",
];

pub struct StudioState {
    cursor: usize,
}

impl StudioState {
    pub fn new() -> Self {
        Self { cursor: 0 }
    }

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };

        match code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.cursor + 1 < STUDIO_TOOLS.len() {
                    self.cursor += 1;
                }
                true
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Enter => {
                let tool = STUDIO_TOOLS[self.cursor];
                services.notify(
                    format!("{tool} integration coming soon!"),
                    NotificationLevel::Info,
                );
                true
            }
            _ => false,
        }
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        pal: &Palette,
        focused: bool,
        visibility: PanelVisibility,
    ) {
        if visibility == PanelVisibility::Collapsed {
            frame.render_widget(pal.block("G", focused), area);
            return;
        }

        let block = pal.block("Studio", focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line> = Vec::new();
        for (idx, tool) in STUDIO_TOOLS.iter().enumerate() {
            let marker = if idx == self.cursor { "› " } else { "  " };
            let style = if idx == self.cursor {
                pal.highlight()
            } else {
                Style::default().fg(pal.text)
            };
            lines.push(Line::from(vec![
                Span::styled(marker.to_string(), pal.highlight()),
                Span::styled((*tool).to_string(), style),
            ]));
        }
        lines.push(Line::raw(""));
        lines.push(Line::styled("  [Enter]:generate", pal.key_hint()));

        frame.render_widget(Paragraph::new(lines), inner);
    }
}
