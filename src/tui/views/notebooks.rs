//! Notebook list view - the landing screen.
//!
//! Shows all notebooks with date and source count. `n` creates a
//! notebook (modal title prompt), `d` deletes after confirmation,
//! `Enter` opens. Data loads asynchronously; results arrive as
//! [`NetEvent::Notebooks`] on the app event channel.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::api::types::Notebook;
use crate::core::prefs::PrefsStore;
use crate::core::workflow;
use crate::tui::events::{AppEvent, NetEvent, NotificationLevel};
use crate::tui::layout::centered_rect;
use crate::tui::services::{notify_from_task, Services};
use crate::tui::theme::Palette;
use crate::tui::widgets::input_buffer::InputBuffer;

/// Result of notebook-list input handling.
pub enum NotebooksResult {
    Consumed,
    /// Open the notebook with this id and title.
    Open(i64, String),
    NotConsumed,
}

enum NotebookModal {
    Create { input: InputBuffer },
    ConfirmDelete { id: i64, title: String },
}

pub struct NotebooksState {
    notebooks: Vec<Notebook>,
    cursor: usize,
    loading: bool,
    modal: Option<NotebookModal>,
}

impl NotebooksState {
    pub fn new() -> Self {
        Self {
            notebooks: Vec::new(),
            cursor: 0,
            loading: false,
            modal: None,
        }
    }

    pub fn notebooks(&self) -> &[Notebook] {
        &self.notebooks
    }

    /// Fetch the notebook list.
    pub fn load(&mut self, services: &Services) {
        if self.loading {
            return;
        }
        self.loading = true;

        let api = services.api.clone();
        let tx = services.event_tx.clone();
        tokio::spawn(async move {
            let result = api
                .list_notebooks()
                .await
                .map_err(|e| e.user_message());
            let _ = tx.send(AppEvent::Net(NetEvent::Notebooks(result)));
        });
    }

    // ── Event handling ──────────────────────────────────────────────────

    pub fn on_loaded(&mut self, result: Result<Vec<Notebook>, String>) {
        self.loading = false;
        if let Ok(notebooks) = result {
            self.notebooks = notebooks;
            self.clamp_cursor();
        }
    }

    /// Created notebooks go to the head of the list.
    pub fn on_created(&mut self, notebook: Notebook) {
        self.notebooks.insert(0, notebook);
        self.cursor = 0;
    }

    pub fn on_deleted(&mut self, id: i64) {
        self.notebooks.retain(|nb| nb.id != id);
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        if self.cursor >= self.notebooks.len() {
            self.cursor = self.notebooks.len().saturating_sub(1);
        }
    }

    // ── Input ───────────────────────────────────────────────────────────

    pub fn handle_input(
        &mut self,
        event: &Event,
        services: &Services,
        prefs: &PrefsStore,
    ) -> NotebooksResult {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return NotebooksResult::NotConsumed;
        };

        if self.modal.is_some() {
            self.handle_modal_input(*code, services, prefs);
            return NotebooksResult::Consumed;
        }

        match code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.cursor + 1 < self.notebooks.len() {
                    self.cursor += 1;
                }
                NotebooksResult::Consumed
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                NotebooksResult::Consumed
            }
            KeyCode::Enter => match self.notebooks.get(self.cursor) {
                Some(nb) => NotebooksResult::Open(nb.id, nb.title.clone()),
                None => NotebooksResult::Consumed,
            },
            KeyCode::Char('n') => {
                self.modal = Some(NotebookModal::Create {
                    input: InputBuffer::new(),
                });
                NotebooksResult::Consumed
            }
            KeyCode::Char('d') => {
                if let Some(nb) = self.notebooks.get(self.cursor) {
                    self.modal = Some(NotebookModal::ConfirmDelete {
                        id: nb.id,
                        title: nb.title.clone(),
                    });
                }
                NotebooksResult::Consumed
            }
            KeyCode::Char('r') => {
                self.load(services);
                NotebooksResult::Consumed
            }
            _ => NotebooksResult::NotConsumed,
        }
    }

    fn handle_modal_input(&mut self, code: KeyCode, services: &Services, prefs: &PrefsStore) {
        match self.modal.as_mut() {
            Some(NotebookModal::Create { input }) => match code {
                KeyCode::Esc => self.modal = None,
                KeyCode::Enter => {
                    let title = input.take();
                    self.modal = None;
                    self.spawn_create(title, services);
                }
                KeyCode::Char(c) => input.insert_char(c),
                KeyCode::Backspace => input.backspace(),
                KeyCode::Delete => input.delete(),
                KeyCode::Left => input.move_left(),
                KeyCode::Right => input.move_right(),
                KeyCode::Home => input.move_home(),
                KeyCode::End => input.move_end(),
                _ => {}
            },
            Some(NotebookModal::ConfirmDelete { id, .. }) => match code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    let id = *id;
                    self.modal = None;
                    self.spawn_delete(id, services, prefs);
                }
                KeyCode::Char('n') | KeyCode::Esc => self.modal = None,
                _ => {}
            },
            None => {}
        }
    }

    fn spawn_create(&self, title: String, services: &Services) {
        let api = services.api.clone();
        let tx = services.event_tx.clone();
        tokio::spawn(async move {
            match workflow::create_notebook(&*api, &title).await {
                Ok(created) => {
                    let _ = tx.send(AppEvent::Net(NetEvent::NotebookCreated(created)));
                }
                Err(e) => {
                    notify_from_task(&tx, e.user_message(), NotificationLevel::Error);
                }
            }
        });
    }

    fn spawn_delete(&self, id: i64, services: &Services, prefs: &PrefsStore) {
        let api = services.api.clone();
        let tx = services.event_tx.clone();
        let prefs = prefs.clone();
        tokio::spawn(async move {
            match workflow::delete_notebook(&*api, &prefs, id).await {
                Ok(()) => {
                    let _ = tx.send(AppEvent::Net(NetEvent::NotebookDeleted(id)));
                }
                Err(e) => {
                    notify_from_task(&tx, e.user_message(), NotificationLevel::Error);
                }
            }
        });
    }

    // ── Render ──────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let block = pal.block_focused("Notebooks");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line> = Vec::new();
        if self.loading && self.notebooks.is_empty() {
            lines.push(Line::styled("  Loading notebooks…", pal.muted()));
        } else if self.notebooks.is_empty() {
            lines.push(Line::styled(
                "  No notebooks yet - press n to create one.",
                pal.muted(),
            ));
        } else {
            for (idx, nb) in self.notebooks.iter().enumerate() {
                let marker = if idx == self.cursor { "› " } else { "  " };
                let title_style = if idx == self.cursor {
                    pal.highlight()
                } else {
                    Style::default().fg(pal.text)
                };
                let count = nb.sources.len();
                let plural = if count == 1 { "source" } else { "sources" };
                lines.push(Line::from(vec![
                    Span::styled(marker.to_string(), pal.highlight()),
                    Span::styled(nb.title.clone(), title_style),
                    Span::styled(format!("  {} · {count} {plural}", nb.date), pal.muted()),
                ]));
            }
        }
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            "  [Enter]:open  [n]:new  [d]:delete  [r]:refresh",
            pal.key_hint(),
        ));

        frame.render_widget(Paragraph::new(lines), inner);

        match &self.modal {
            Some(NotebookModal::Create { input }) => {
                self.render_create_modal(frame, area, pal, input)
            }
            Some(NotebookModal::ConfirmDelete { title, .. }) => {
                self.render_delete_modal(frame, area, pal, title)
            }
            None => {}
        }
    }

    fn render_create_modal(
        &self,
        frame: &mut Frame,
        area: Rect,
        pal: &Palette,
        input: &InputBuffer,
    ) {
        let rect = centered_rect(48, 5, area);
        frame.render_widget(Clear, rect);
        let block = pal.block_focused("Create notebook");
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let lines = vec![
            Line::from(vec![
                Span::styled("Title: ", pal.heading()),
                Span::raw(input.text().to_string()),
                Span::styled("▏", pal.highlight()),
            ]),
            Line::raw(""),
            Line::styled("[Enter]:create  [Esc]:cancel", pal.key_hint()),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_delete_modal(&self, frame: &mut Frame, area: Rect, pal: &Palette, title: &str) {
        let rect = centered_rect(52, 5, area);
        frame.render_widget(Clear, rect);
        let block = pal.block_focused("Delete notebook");
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let lines = vec![
            Line::from(vec![
                Span::raw("Delete \""),
                Span::styled(title.to_string(), pal.highlight()),
                Span::raw("\" and its chat history?"),
            ]),
            Line::raw(""),
            Line::styled("[y]:delete  [n]:cancel", pal.key_hint()),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notebook(id: i64, title: &str) -> Notebook {
        Notebook {
            id,
            title: title.to_string(),
            date: "Aug 29, 2026".to_string(),
            sources: Vec::new(),
            category: None,
            description: None,
        }
    }

    #[test]
    fn test_created_goes_to_head() {
        let mut state = NotebooksState::new();
        state.on_loaded(Ok(vec![notebook(1, "old")]));
        state.on_created(notebook(2, "new"));
        assert_eq!(state.notebooks()[0].id, 2);
        assert_eq!(state.notebooks().len(), 2);
    }

    #[test]
    fn test_deleted_removed_and_cursor_clamped() {
        let mut state = NotebooksState::new();
        state.on_loaded(Ok(vec![notebook(1, "a"), notebook(2, "b")]));
        state.cursor = 1;
        state.on_deleted(2);
        assert_eq!(state.notebooks().len(), 1);
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_failed_load_keeps_existing_list() {
        let mut state = NotebooksState::new();
        state.on_loaded(Ok(vec![notebook(1, "a")]));
        state.on_loaded(Err("boom".to_string()));
        assert_eq!(state.notebooks().len(), 1);
        assert!(!state.loading);
    }
}
