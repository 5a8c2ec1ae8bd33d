//! Chat pane for the active notebook.
//!
//! Transcript plus an insert-mode input line. Replies come from the
//! demo engine in `core::chat`: a canned response after an artificial
//! delay, scheduled on a spawned task and delivered back as
//! [`AppEvent::ChatReply`]. Sending is gated on selected sources and on
//! no reply being in flight.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use rand::thread_rng;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::core::chat::{self, Role, Transcript, GREETING, GREETING_DELAY};
use crate::core::prefs::PrefsStore;
use crate::tui::events::AppEvent;
use crate::tui::services::Services;
use crate::tui::theme::Palette;
use crate::tui::widgets::input_buffer::InputBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Insert,
}

pub struct ChatViewState {
    notebook_id: Option<i64>,
    transcript: Transcript,
    input: InputBuffer,
    input_mode: InputMode,
    reply_pending: bool,
    /// Set once the opening greeting has been queued (or was already in
    /// the restored transcript), so re-fetches don't schedule it twice.
    greeting_scheduled: bool,
    /// Lines scrolled up from the transcript tail.
    scroll_from_bottom: u16,
}

impl ChatViewState {
    pub fn new() -> Self {
        Self {
            notebook_id: None,
            transcript: Transcript::new(),
            input: InputBuffer::new(),
            input_mode: InputMode::Normal,
            reply_pending: false,
            greeting_scheduled: false,
            scroll_from_bottom: 0,
        }
    }

    pub fn notebook_id(&self) -> Option<i64> {
        self.notebook_id
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn reply_pending(&self) -> bool {
        self.reply_pending
    }

    /// Enter a notebook: restore its saved transcript, if any.
    pub fn open(&mut self, notebook_id: i64, prefs: &PrefsStore) {
        self.notebook_id = Some(notebook_id);
        self.transcript = prefs.load_chat(notebook_id).unwrap_or_default();
        self.input.clear();
        self.input_mode = InputMode::Normal;
        self.reply_pending = false;
        // A restored transcript already contains its greeting.
        self.greeting_scheduled = !self.transcript.is_empty();
        self.scroll_from_bottom = 0;
    }

    /// Leave the notebook, persisting the transcript.
    pub fn close(&mut self, prefs: &PrefsStore) {
        if let Some(id) = self.notebook_id.take() {
            if !self.transcript.is_empty() {
                if let Err(e) = prefs.save_chat(id, &self.transcript) {
                    log::warn!("Failed to save chat transcript for notebook {id}: {e}");
                }
            }
        }
        self.transcript.clear();
        self.reply_pending = false;
        self.greeting_scheduled = false;
    }

    /// Queue the opening greeting once sources are known to exist. Safe
    /// to call repeatedly; only the first call schedules anything.
    pub fn maybe_schedule_greeting(&mut self, services: &Services) {
        let Some(notebook_id) = self.notebook_id else {
            return;
        };
        if self.greeting_scheduled {
            return;
        }
        self.greeting_scheduled = true;

        let tx = services.event_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(GREETING_DELAY).await;
            let _ = tx.send(AppEvent::ChatReply {
                notebook_id,
                content: GREETING.to_string(),
            });
        });
    }

    /// A scheduled reply (or greeting) arrived for the open notebook.
    pub fn on_reply(&mut self, content: String, prefs: &PrefsStore) {
        let Some(id) = self.notebook_id else {
            return;
        };
        self.transcript.push_ai(content);
        self.reply_pending = false;
        self.scroll_from_bottom = 0;
        if let Err(e) = prefs.save_chat(id, &self.transcript) {
            log::warn!("Failed to save chat transcript for notebook {id}: {e}");
        }
    }

    // ── Input ───────────────────────────────────────────────────────────

    pub fn handle_input(
        &mut self,
        event: &Event,
        services: &Services,
        prefs: &PrefsStore,
        selected_count: usize,
    ) -> bool {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };

        match self.input_mode {
            InputMode::Normal => match code {
                KeyCode::Char('i') | KeyCode::Enter => {
                    self.input_mode = InputMode::Insert;
                    true
                }
                KeyCode::Char('j') | KeyCode::Down => {
                    self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(1);
                    true
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(1);
                    true
                }
                KeyCode::Char('G') => {
                    self.scroll_from_bottom = 0;
                    true
                }
                _ => false,
            },
            InputMode::Insert => {
                match code {
                    KeyCode::Esc => self.input_mode = InputMode::Normal,
                    KeyCode::Enter => self.send(services, prefs, selected_count),
                    KeyCode::Char(c) => self.input.insert_char(*c),
                    KeyCode::Backspace => self.input.backspace(),
                    KeyCode::Delete => self.input.delete(),
                    KeyCode::Left => self.input.move_left(),
                    KeyCode::Right => self.input.move_right(),
                    KeyCode::Home => self.input.move_home(),
                    KeyCode::End => self.input.move_end(),
                    _ => {}
                }
                true
            }
        }
    }

    /// Submit the input line and schedule a demo reply.
    fn send(&mut self, services: &Services, prefs: &PrefsStore, selected_count: usize) {
        let Some(notebook_id) = self.notebook_id else {
            return;
        };
        if self.input.is_empty() || !chat::can_send(selected_count, self.reply_pending) {
            return;
        }

        let message = self.input.take().trim().to_string();
        self.transcript.push_user(message);
        self.reply_pending = true;
        self.scroll_from_bottom = 0;
        if let Err(e) = prefs.save_chat(notebook_id, &self.transcript) {
            log::warn!("Failed to save chat transcript for notebook {notebook_id}: {e}");
        }

        // ThreadRng is not Send: pick the reply and delay before spawning.
        let mut rng = thread_rng();
        let reply = chat::pick_response(&mut rng);
        let delay = chat::response_delay(&mut rng);

        let tx = services.event_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(AppEvent::ChatReply {
                notebook_id,
                content: reply.to_string(),
            });
        });
    }

    // ── Render ──────────────────────────────────────────────────────────

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        pal: &Palette,
        focused: bool,
        selected_count: usize,
    ) {
        let block = pal.block("Chat", focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).split(inner);
        self.render_transcript(frame, rows[0], pal, selected_count);
        self.render_input(frame, rows[1], pal, selected_count);
    }

    fn render_transcript(
        &self,
        frame: &mut Frame,
        area: Rect,
        pal: &Palette,
        selected_count: usize,
    ) {
        let mut lines: Vec<Line> = Vec::new();

        if self.transcript.is_empty() {
            lines.push(Line::styled("Add a source to get started.", pal.muted()));
        }
        for message in self.transcript.messages() {
            let (label, style) = match message.role {
                Role::User => ("You", pal.highlight()),
                Role::Ai => ("MetroDoc", pal.heading()),
            };
            lines.push(Line::from(vec![
                Span::styled(label, style),
                Span::styled(
                    format!("  {}", message.sent_at.format("%H:%M")),
                    pal.dim(),
                ),
            ]));
            for text_line in message.content.lines() {
                lines.push(Line::raw(text_line.to_string()));
            }
            lines.push(Line::raw(""));
        }
        if self.reply_pending {
            lines.push(Line::styled("MetroDoc is thinking…", pal.dim()));
        } else if self.transcript.is_empty() && selected_count > 0 {
            lines.push(Line::styled("Preparing your notebook…", pal.dim()));
        }

        // Pin the tail to the bottom, offset by manual scroll. The
        // paragraph word-wraps, so the row count must account for
        // wrapping at this width, not just logical lines.
        let total: usize = lines
            .iter()
            .map(|line| {
                let text: String = line
                    .spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect();
                wrapped_rows(&text, area.width) as usize
            })
            .sum();
        let total = total.min(u16::MAX as usize) as u16;
        let visible = area.height;
        let bottom_offset = total.saturating_sub(visible);
        let scroll = bottom_offset.saturating_sub(self.scroll_from_bottom);

        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((scroll, 0)),
            area,
        );
    }

    fn render_input(&self, frame: &mut Frame, area: Rect, pal: &Palette, selected_count: usize) {
        let gated = !chat::can_send(selected_count, self.reply_pending);
        let mut lines: Vec<Line> = Vec::new();

        if self.input_mode == InputMode::Insert {
            lines.push(Line::from(vec![
                Span::styled(" INSERT ", pal.insert_badge()),
                Span::raw(" "),
                Span::raw(self.input.text().to_string()),
                Span::styled("▏", pal.highlight()),
            ]));
        } else {
            let prompt = if self.input.text().is_empty() {
                "Press i to type a message".to_string()
            } else {
                self.input.text().to_string()
            };
            lines.push(Line::styled(format!(" › {prompt}"), pal.muted()));
        }

        let hint = if selected_count == 0 {
            "Select at least one source to chat"
        } else if self.reply_pending {
            "Waiting for a reply…"
        } else {
            "[Enter]:send  [Esc]:normal mode"
        };
        let hint_style = if gated { pal.dim() } else { pal.key_hint() };
        lines.push(Line::styled(format!(" {hint}"), hint_style));

        frame.render_widget(Paragraph::new(lines), area);
    }
}

/// Rows one logical line occupies after greedy word wrapping at `width`.
/// Words longer than a row hard-wrap mid-word.
fn wrapped_rows(text: &str, width: u16) -> u16 {
    let width = width.max(1) as usize;
    let mut rows = 1usize;
    let mut col = 0usize;
    for word in text.split(' ') {
        let word_len = word.chars().count();
        let needed = if col == 0 { word_len } else { word_len + 1 };
        if col + needed <= width {
            col += needed;
        } else if word_len <= width {
            rows += 1;
            col = word_len;
        } else {
            if col > 0 {
                rows += 1;
            }
            rows += (word_len - 1) / width;
            col = word_len - ((word_len - 1) / width) * width;
        }
    }
    rows.min(u16::MAX as usize) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, PrefsStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = PrefsStore::open(tmp.path());
        (tmp, store)
    }

    #[test]
    fn test_open_restores_saved_transcript() {
        let (_tmp, prefs) = store();
        let mut saved = Transcript::new();
        saved.push_ai(GREETING);
        saved.push_user("hello");
        prefs.save_chat(9, &saved).unwrap();

        let mut view = ChatViewState::new();
        view.open(9, &prefs);
        assert_eq!(view.transcript.len(), 2);
        assert!(view.greeting_scheduled);
    }

    #[test]
    fn test_open_fresh_notebook_awaits_greeting() {
        let (_tmp, prefs) = store();
        let mut view = ChatViewState::new();
        view.open(9, &prefs);
        assert!(view.transcript.is_empty());
        assert!(!view.greeting_scheduled);
    }

    #[test]
    fn test_reply_clears_pending_and_persists() {
        let (_tmp, prefs) = store();
        let mut view = ChatViewState::new();
        view.open(9, &prefs);
        view.reply_pending = true;

        view.on_reply("canned".to_string(), &prefs);
        assert!(!view.reply_pending);
        assert_eq!(view.transcript.len(), 1);

        let reloaded = prefs.load_chat(9).unwrap();
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_wrapped_rows_counts_word_wrap() {
        assert_eq!(wrapped_rows("", 10), 1);
        assert_eq!(wrapped_rows("short", 10), 1);
        // "five five" fits a 10-wide row; the third word wraps.
        assert_eq!(wrapped_rows("five five five", 10), 2);
        // A word pushed whole to the next row, not split at the width.
        assert_eq!(wrapped_rows("aaaa bbbbbbbb", 10), 2);
        // An unbroken word hard-wraps across rows.
        assert_eq!(wrapped_rows(&"x".repeat(25), 10), 3);
    }

    #[test]
    fn test_close_persists_transcript() {
        let (_tmp, prefs) = store();
        let mut view = ChatViewState::new();
        view.open(9, &prefs);
        view.transcript.push_user("note to self");
        view.close(&prefs);

        assert!(view.notebook_id().is_none());
        assert_eq!(prefs.load_chat(9).unwrap().len(), 1);
    }
}
