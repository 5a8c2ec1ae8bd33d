//! Sources panel - the active notebook's source files.
//!
//! Checkbox list with a tri-state select-all header, upload modal,
//! inline rename editor, and delete confirmation. All mutations run as
//! spawned tasks against the workflow layer and settle through the
//! reconciling re-fetch carried back on the event channel; the view
//! never hand-patches the list.

use std::path::PathBuf;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::api::types::SourceFile;
use crate::core::source_list::{SourceId, SourceList};
use crate::core::workflow::{self, UploadFile};
use crate::tui::events::{AppEvent, NetEvent, NotificationLevel};
use crate::tui::layout::{centered_rect, PanelVisibility};
use crate::tui::services::{notify_from_task, Services};
use crate::tui::theme::Palette;
use crate::tui::widgets::input_buffer::InputBuffer;

enum SourcesMode {
    Normal,
    /// Upload modal: one or more filesystem paths, `;`-separated.
    Upload { input: InputBuffer },
    ConfirmDelete { id: SourceId },
    /// Inline rename. `saving` is set once the commit is in flight;
    /// on failure the row reverts to `original` simply by dropping
    /// this mode (the list itself was never touched).
    Renaming {
        id: SourceId,
        original: String,
        input: InputBuffer,
        saving: bool,
    },
}

pub struct SourcesState {
    notebook_id: Option<i64>,
    pub list: SourceList,
    cursor: usize,
    loading: bool,
    mode: SourcesMode,
}

impl SourcesState {
    pub fn new() -> Self {
        Self {
            notebook_id: None,
            list: SourceList::new(),
            cursor: 0,
            loading: false,
            mode: SourcesMode::Normal,
        }
    }

    pub fn notebook_id(&self) -> Option<i64> {
        self.notebook_id
    }

    pub fn selected_count(&self) -> usize {
        self.list.selected_count()
    }

    /// Whether an input-consuming mode (modal/editor) is active.
    pub fn modal_open(&self) -> bool {
        !matches!(self.mode, SourcesMode::Normal)
    }

    /// Enter a notebook: reset state and fetch its sources.
    pub fn open(&mut self, notebook_id: i64, services: &Services) {
        self.notebook_id = Some(notebook_id);
        self.cursor = 0;
        self.mode = SourcesMode::Normal;
        self.spawn_load(services);
    }

    /// Leave the notebook view, invalidating any in-flight fetch.
    pub fn close(&mut self) {
        self.notebook_id = None;
        self.list.clear();
        self.mode = SourcesMode::Normal;
        self.loading = false;
    }

    fn spawn_load(&mut self, services: &Services) {
        let Some(notebook_id) = self.notebook_id else {
            return;
        };
        self.loading = true;
        let token = self.list.begin_load();
        let api = services.api.clone();
        let tx = services.event_tx.clone();
        tokio::spawn(async move {
            let result = workflow::refetch_sources(&*api, notebook_id)
                .await
                .map_err(|e| e.user_message());
            if let Err(msg) = &result {
                notify_from_task(&tx, msg.clone(), NotificationLevel::Error);
            }
            let _ = tx.send(AppEvent::Net(NetEvent::Sources {
                notebook_id,
                token,
                result,
            }));
        });
    }

    // ── Event handling ──────────────────────────────────────────────────

    /// A source fetch settled (initial load or post-mutation re-fetch).
    pub fn on_sources(&mut self, token: u64, result: Result<Vec<SourceFile>, String>) {
        self.loading = false;
        if let Ok(sources) = result {
            if self.list.apply_load(token, sources) {
                self.clamp_cursor();
            }
        }
    }

    /// The reconciling re-fetch of a settled upload or delete arrived.
    pub fn on_sources_refreshed(&mut self, sources: Vec<SourceFile>) {
        self.list.replace(sources);
        self.clamp_cursor();
    }

    /// A rename commit settled. On failure or skip the editor closes and
    /// the original name shows again - the rollback the workflow
    /// contract requires.
    pub fn on_rename_settled(&mut self, result: Result<Option<Vec<SourceFile>>, String>) {
        if !matches!(self.mode, SourcesMode::Renaming { saving: true, .. }) {
            return;
        }
        self.mode = SourcesMode::Normal;
        if let Ok(Some(fresh)) = result {
            self.list.replace(fresh);
            self.clamp_cursor();
        }
    }

    fn clamp_cursor(&mut self) {
        if self.cursor >= self.list.len() {
            self.cursor = self.list.len().saturating_sub(1);
        }
    }

    // ── Input ───────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };

        match &mut self.mode {
            SourcesMode::Normal => self.handle_normal_input(*code, services),
            SourcesMode::Upload { .. } => {
                self.handle_upload_input(*code, services);
                true
            }
            SourcesMode::ConfirmDelete { .. } => {
                self.handle_confirm_delete_input(*code, services);
                true
            }
            SourcesMode::Renaming { .. } => {
                self.handle_rename_input(*code, services);
                true
            }
        }
    }

    fn handle_normal_input(&mut self, code: KeyCode, services: &Services) -> bool {
        match code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.cursor + 1 < self.list.len() {
                    self.cursor += 1;
                }
                true
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Char(' ') => {
                if let Some(source) = self.list.get_index(self.cursor) {
                    let id = source.id();
                    let checked = !source.selected;
                    self.list.toggle_one(&id, checked);
                }
                true
            }
            KeyCode::Char('a') => {
                // Select-all header: checked collapses to none, anything
                // else fills to all (tri-state checkbox click semantics).
                let target = !self.list.aggregate_state().checked;
                self.list.toggle_all(target);
                true
            }
            KeyCode::Char('u') => {
                self.mode = SourcesMode::Upload {
                    input: InputBuffer::new(),
                };
                true
            }
            KeyCode::Char('d') => {
                if let Some(source) = self.list.get_index(self.cursor) {
                    self.mode = SourcesMode::ConfirmDelete { id: source.id() };
                }
                true
            }
            KeyCode::Char('e') | KeyCode::F(2) => {
                if let Some(source) = self.list.get_index(self.cursor) {
                    self.mode = SourcesMode::Renaming {
                        id: source.id(),
                        original: source.name.clone(),
                        input: InputBuffer::with_selected_stem(&source.name),
                        saving: false,
                    };
                }
                true
            }
            KeyCode::Char('r') => {
                self.spawn_load(services);
                true
            }
            _ => false,
        }
    }

    fn handle_upload_input(&mut self, code: KeyCode, services: &Services) {
        let SourcesMode::Upload { input } = &mut self.mode else {
            return;
        };
        match code {
            KeyCode::Esc => self.mode = SourcesMode::Normal,
            KeyCode::Enter => {
                let raw = input.take();
                self.mode = SourcesMode::Normal;
                self.spawn_upload(raw, services);
            }
            KeyCode::Char(c) => input.insert_char(c),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            _ => {}
        }
    }

    fn handle_confirm_delete_input(&mut self, code: KeyCode, services: &Services) {
        let SourcesMode::ConfirmDelete { id } = &self.mode else {
            return;
        };
        match code {
            KeyCode::Char('y') | KeyCode::Enter => {
                let name = id.as_str().to_string();
                self.mode = SourcesMode::Normal;
                self.spawn_delete(name, services);
            }
            KeyCode::Char('n') | KeyCode::Esc => self.mode = SourcesMode::Normal,
            _ => {}
        }
    }

    fn handle_rename_input(&mut self, code: KeyCode, services: &Services) {
        let SourcesMode::Renaming {
            original,
            input,
            saving,
            ..
        } = &mut self.mode
        else {
            return;
        };
        if *saving {
            // Commit in flight; the editor settles via RenameSettled.
            return;
        }
        match code {
            // Escape cancels without committing: the original name shows
            // again and no request is issued.
            KeyCode::Esc => self.mode = SourcesMode::Normal,
            KeyCode::Enter => {
                let original = original.clone();
                let new_name = input.text().to_string();
                *saving = true;
                self.spawn_rename(original, new_name, services);
            }
            KeyCode::Char(c) => input.insert_char(c),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            _ => {}
        }
    }

    // ── Mutation tasks ──────────────────────────────────────────────────

    fn spawn_upload(&mut self, raw_paths: String, services: &Services) {
        let Some(notebook_id) = self.notebook_id else {
            return;
        };
        let paths: Vec<PathBuf> = raw_paths
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect();
        if paths.is_empty() {
            return;
        }

        let existing_names = self.list.names();
        let api = services.api.clone();
        let tx = services.event_tx.clone();
        tokio::spawn(async move {
            let mut files = Vec::with_capacity(paths.len());
            for path in paths {
                let name = match path.file_name().and_then(|n| n.to_str()) {
                    Some(name) => name.to_string(),
                    None => {
                        notify_from_task(
                            &tx,
                            format!("Invalid file path: {}", path.display()),
                            NotificationLevel::Error,
                        );
                        continue;
                    }
                };
                match tokio::fs::read(&path).await {
                    Ok(bytes) => files.push(UploadFile { name, bytes }),
                    Err(e) => notify_from_task(
                        &tx,
                        format!("Could not read {}: {e}", path.display()),
                        NotificationLevel::Error,
                    ),
                }
            }
            if files.is_empty() {
                return;
            }

            match workflow::upload_batch(&*api, notebook_id, &existing_names, files).await {
                Ok(report) => {
                    for outcome in &report.outcomes {
                        if let Err(e) = &outcome.result {
                            notify_from_task(&tx, e.user_message(), NotificationLevel::Error);
                        }
                    }
                    let accepted = report.accepted_count();
                    if accepted > 0 {
                        let plural = if accepted == 1 { "source" } else { "sources" };
                        notify_from_task(
                            &tx,
                            format!("Added {accepted} {plural}"),
                            NotificationLevel::Success,
                        );
                    }
                    if let Some(fresh) = report.refreshed {
                        let _ = tx.send(AppEvent::Net(NetEvent::SourcesRefreshed {
                            notebook_id,
                            sources: fresh,
                        }));
                    }
                }
                Err(e) => {
                    notify_from_task(&tx, e.user_message(), NotificationLevel::Error);
                }
            }
        });
    }

    fn spawn_delete(&mut self, name: String, services: &Services) {
        let Some(notebook_id) = self.notebook_id else {
            return;
        };
        let api = services.api.clone();
        let tx = services.event_tx.clone();
        tokio::spawn(async move {
            match workflow::delete_source(&*api, notebook_id, &name).await {
                Ok(fresh) => {
                    notify_from_task(
                        &tx,
                        format!("Deleted {name}"),
                        NotificationLevel::Success,
                    );
                    let _ = tx.send(AppEvent::Net(NetEvent::SourcesRefreshed {
                        notebook_id,
                        sources: fresh,
                    }));
                }
                Err(e) => {
                    notify_from_task(&tx, e.user_message(), NotificationLevel::Error);
                }
            }
        });
    }

    fn spawn_rename(&mut self, original: String, new_name: String, services: &Services) {
        let Some(notebook_id) = self.notebook_id else {
            return;
        };
        let api = services.api.clone();
        let tx = services.event_tx.clone();
        tokio::spawn(async move {
            let result = match workflow::rename_source(&*api, notebook_id, &original, &new_name)
                .await
            {
                Ok(workflow::RenameOutcome::Skipped) => Ok(None),
                Ok(workflow::RenameOutcome::Renamed(fresh)) => {
                    notify_from_task(
                        &tx,
                        format!("Renamed to {}", new_name.trim()),
                        NotificationLevel::Success,
                    );
                    Ok(Some(fresh))
                }
                Err(e) => {
                    notify_from_task(&tx, e.user_message(), NotificationLevel::Error);
                    Err(e.user_message())
                }
            };
            let _ = tx.send(AppEvent::Net(NetEvent::RenameSettled {
                notebook_id,
                result,
            }));
        });
    }

    // ── Render ──────────────────────────────────────────────────────────

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        pal: &Palette,
        focused: bool,
        visibility: PanelVisibility,
    ) {
        if visibility == PanelVisibility::Collapsed {
            frame.render_widget(pal.block("S", focused), area);
            return;
        }

        let title = format!("Sources ({})", self.list.len());
        let block = pal.block(&title, focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line> = Vec::new();

        if self.loading && self.list.is_empty() {
            lines.push(Line::styled(" Loading sources…", pal.muted()));
        } else if self.list.is_empty() {
            lines.push(Line::styled(" No sources yet.", pal.muted()));
            lines.push(Line::styled(" Press u to upload a file.", pal.muted()));
        } else {
            let agg = self.list.aggregate_state();
            lines.push(Line::from(vec![
                Span::styled(format!(" {} ", agg.glyph()), pal.heading()),
                Span::styled("Select all", pal.muted()),
            ]));
            for (idx, source) in self.list.iter().enumerate() {
                lines.push(self.render_row(idx, source, pal));
            }
        }

        frame.render_widget(Paragraph::new(lines), inner);

        match &self.mode {
            SourcesMode::Upload { input } => self.render_upload_modal(frame, area, pal, input),
            SourcesMode::ConfirmDelete { id } => {
                self.render_delete_modal(frame, area, pal, id.as_str())
            }
            _ => {}
        }
    }

    fn render_row(
        &self,
        idx: usize,
        source: &crate::core::source_list::Source,
        pal: &Palette,
    ) -> Line<'static> {
        let marker = if idx == self.cursor { "›" } else { " " };
        let checkbox = if source.selected { "[x]" } else { "[ ]" };

        // The row under rename shows the editor instead of the name.
        if let SourcesMode::Renaming {
            original,
            input,
            saving,
            ..
        } = &self.mode
        {
            if *original == source.name {
                let mut spans = vec![
                    Span::styled(format!("{marker}{checkbox} "), pal.heading()),
                ];
                spans.extend(editor_spans(input, pal));
                if *saving {
                    spans.push(Span::styled(" (saving…)", pal.dim()));
                }
                return Line::from(spans);
            }
        }

        let name_style = if idx == self.cursor {
            pal.highlight()
        } else {
            Style::default().fg(pal.text)
        };
        Line::from(vec![
            Span::styled(format!("{marker}{checkbox} "), pal.heading()),
            Span::styled(source.name.clone(), name_style),
            Span::styled(format!(" {}", source.display_size()), pal.dim()),
        ])
    }

    fn render_upload_modal(
        &self,
        frame: &mut Frame,
        area: Rect,
        pal: &Palette,
        input: &InputBuffer,
    ) {
        let rect = centered_rect(area.width.saturating_sub(4).min(64), 6, area);
        frame.render_widget(Clear, rect);
        let block = pal.block_focused("Upload sources");
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let lines = vec![
            Line::styled("File path(s), separated by ;", pal.muted()),
            Line::from(vec![
                Span::raw(input.text().to_string()),
                Span::styled("▏", pal.highlight()),
            ]),
            Line::raw(""),
            Line::styled("[Enter]:upload  [Esc]:cancel", pal.key_hint()),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_delete_modal(&self, frame: &mut Frame, area: Rect, pal: &Palette, name: &str) {
        let rect = centered_rect(area.width.saturating_sub(4).min(52), 5, area);
        frame.render_widget(Clear, rect);
        let block = pal.block_focused("Delete source");
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let lines = vec![
            Line::from(vec![
                Span::raw("Delete \""),
                Span::styled(name.to_string(), pal.highlight()),
                Span::raw("\"?"),
            ]),
            Line::raw(""),
            Line::styled("[y]:delete  [n]:cancel", pal.key_hint()),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

/// Render an inline editor's text with its selection reversed.
fn editor_spans(input: &InputBuffer, pal: &Palette) -> Vec<Span<'static>> {
    let text = input.text();
    match input.selection() {
        Some((start, end)) => vec![
            Span::raw(text[..start].to_string()),
            Span::styled(
                text[start..end].to_string(),
                Style::default().add_modifier(Modifier::REVERSED),
            ),
            Span::raw(text[end..].to_string()),
            Span::styled("▏", pal.highlight()),
        ],
        None => vec![
            Span::raw(text.to_string()),
            Span::styled("▏", pal.highlight()),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(name: &str, size: u64) -> SourceFile {
        SourceFile {
            name: name.to_string(),
            path: None,
            size,
            content_type: None,
        }
    }

    fn loaded_state(names: &[&str]) -> SourcesState {
        let mut state = SourcesState::new();
        state.notebook_id = Some(1);
        let token = state.list.begin_load();
        state.on_sources(
            token,
            Ok(names.iter().map(|n| wire(n, 100)).collect()),
        );
        state
    }

    #[test]
    fn test_load_selects_all() {
        let state = loaded_state(&["a.pdf", "b.pdf"]);
        assert_eq!(state.selected_count(), 2);
        assert!(!state.loading);
    }

    #[test]
    fn test_stale_sources_ignored() {
        let mut state = loaded_state(&["a.pdf"]);
        let stale = state.list.current_generation();
        let _newer = state.list.begin_load();
        state.on_sources(stale, Ok(vec![wire("late.pdf", 1)]));
        assert_eq!(state.list.names(), vec!["a.pdf"]);
    }

    #[test]
    fn test_rename_failure_reverts_display() {
        let mut state = loaded_state(&["a.pdf"]);
        state.mode = SourcesMode::Renaming {
            id: SourceId::new("a.pdf"),
            original: "a.pdf".to_string(),
            input: InputBuffer::with_text("b.pdf"),
            saving: true,
        };
        state.on_rename_settled(Err("rename failed".to_string()));

        // Editor closed, list untouched: the displayed name is the original.
        assert!(matches!(state.mode, SourcesMode::Normal));
        assert_eq!(state.list.names(), vec!["a.pdf"]);
    }

    #[test]
    fn test_rename_skip_closes_editor_silently() {
        let mut state = loaded_state(&["a.pdf"]);
        state.mode = SourcesMode::Renaming {
            id: SourceId::new("a.pdf"),
            original: "a.pdf".to_string(),
            input: InputBuffer::with_text("a.pdf"),
            saving: true,
        };
        state.on_rename_settled(Ok(None));
        assert!(matches!(state.mode, SourcesMode::Normal));
        assert_eq!(state.list.names(), vec!["a.pdf"]);
    }

    #[test]
    fn test_failed_rename_leaves_pending_load_applicable() {
        let mut state = SourcesState::new();
        state.notebook_id = Some(1);
        let pending = state.list.begin_load();
        state.mode = SourcesMode::Renaming {
            id: SourceId::new("a.pdf"),
            original: "a.pdf".to_string(),
            input: InputBuffer::with_text("b.pdf"),
            saving: true,
        };

        // The rename fails before any re-fetch is published; the fetch
        // issued before it must still apply when it arrives.
        state.on_rename_settled(Err("rename failed".to_string()));
        state.on_sources(pending, Ok(vec![wire("a.pdf", 1)]));
        assert_eq!(state.list.names(), vec!["a.pdf"]);
    }

    #[test]
    fn test_mutation_refresh_supersedes_pending_load() {
        let mut state = loaded_state(&["a.pdf"]);
        let stale = state.list.begin_load();

        state.on_sources_refreshed(vec![wire("a.pdf", 1), wire("b.pdf", 1)]);
        // The fetch issued before the mutation settles late and is dropped.
        state.on_sources(stale, Ok(vec![wire("a.pdf", 1)]));
        assert_eq!(state.list.len(), 2);
    }

    #[test]
    fn test_close_clears_list() {
        let mut state = loaded_state(&["a.pdf"]);
        state.close();
        assert!(state.list.is_empty());
        assert!(state.notebook_id().is_none());
    }
}
