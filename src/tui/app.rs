//! Application shell: state, event loop, and top-level render.
//!
//! The loop is render → select → update: draw the current state, wait on
//! the tick interval, the app event channel, or terminal input, then fold
//! the event into state. Views never draw outside their rects and never
//! block; everything slow runs on spawned tasks that report back through
//! the channel.

use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::Backend,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::core::prefs::PrefsStore;

use super::events::{Action, AppEvent, NetEvent, Notification, NotificationLevel, Pane};
use super::layout::{centered_rect, AppLayout, PanelLayout};
use super::services::Services;
use super::theme::{palette, Palette};
use super::views::chat::ChatViewState;
use super::views::notebooks::{NotebooksResult, NotebooksState};
use super::views::sources::SourcesState;
use super::views::studio::StudioState;

/// Most notifications shown at once; older ones are dropped first.
const MAX_NOTIFICATIONS: usize = 3;

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    NotebookList,
    Notebook,
}

pub struct AppState {
    running: bool,
    screen: Screen,
    pane: Pane,

    notebooks: NotebooksState,
    sources: SourcesState,
    chat: ChatViewState,
    studio: StudioState,
    notebook_title: String,

    prefs: PrefsStore,
    services: Services,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,

    notifications: Vec<Notification>,
    notification_counter: u64,
    show_help: bool,
}

impl AppState {
    pub fn new(
        services: Services,
        prefs: PrefsStore,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
    ) -> Self {
        Self {
            running: true,
            screen: Screen::NotebookList,
            pane: Pane::Chat,
            notebooks: NotebooksState::new(),
            sources: SourcesState::new(),
            chat: ChatViewState::new(),
            studio: StudioState::new(),
            notebook_title: String::new(),
            prefs,
            services,
            event_rx,
            notifications: Vec::new(),
            notification_counter: 0,
            show_help: false,
        }
    }

    /// Main loop. Returns when the user quits.
    pub async fn run<B>(
        &mut self,
        terminal: &mut Terminal<B>,
        tick_rate: Duration,
    ) -> io::Result<()>
    where
        B: Backend<Error = io::Error>,
    {
        let mut input_events = EventStream::new();
        let mut ticker = tokio::time::interval(tick_rate);

        self.notebooks.load(&self.services);

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = ticker.tick() => self.on_tick(),
                event = self.event_rx.recv() => {
                    if let Some(event) = event {
                        self.handle_event(event);
                    }
                }
                maybe_input = input_events.next() => match maybe_input {
                    Some(Ok(event)) => self.handle_event(AppEvent::Input(event)),
                    Some(Err(e)) => log::error!("Terminal input error: {e}"),
                    None => self.running = false,
                },
            }
        }
        Ok(())
    }

    // ── Update ──────────────────────────────────────────────────────────

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => self.on_tick(),
            AppEvent::Input(input) => self.handle_input(input),
            AppEvent::Net(net) => self.handle_net(net),
            AppEvent::ChatReply {
                notebook_id,
                content,
            } => {
                // Replies scheduled for a notebook that is no longer open
                // are dropped.
                if self.chat.notebook_id() == Some(notebook_id) {
                    self.chat.on_reply(content, &self.prefs);
                }
            }
            AppEvent::Notification(notification) => self.push_notification(notification),
            AppEvent::Quit => self.running = false,
        }
    }

    fn handle_net(&mut self, event: NetEvent) {
        match event {
            NetEvent::Notebooks(result) => {
                if let Err(msg) = &result {
                    self.push_notification(Notification::new(
                        msg.clone(),
                        NotificationLevel::Error,
                    ));
                }
                self.notebooks.on_loaded(result);
            }
            NetEvent::NotebookCreated(notebook) => {
                self.push_notification(Notification::new(
                    format!("Created \"{}\"", notebook.title),
                    NotificationLevel::Success,
                ));
                self.notebooks.on_created(notebook);
            }
            NetEvent::NotebookDeleted(id) => {
                self.push_notification(Notification::new(
                    "Notebook deleted",
                    NotificationLevel::Success,
                ));
                self.notebooks.on_deleted(id);
            }
            NetEvent::Sources {
                notebook_id,
                token,
                result,
            } => {
                if self.sources.notebook_id() != Some(notebook_id) {
                    return;
                }
                self.sources.on_sources(token, result);
                // The greeting waits until the notebook is known to have
                // sources to talk about.
                if !self.sources.list.is_empty() && self.chat.notebook_id() == Some(notebook_id)
                {
                    self.chat.maybe_schedule_greeting(&self.services);
                }
            }
            NetEvent::SourcesRefreshed {
                notebook_id,
                sources,
            } => {
                if self.sources.notebook_id() != Some(notebook_id) {
                    return;
                }
                self.sources.on_sources_refreshed(sources);
                if !self.sources.list.is_empty() && self.chat.notebook_id() == Some(notebook_id)
                {
                    self.chat.maybe_schedule_greeting(&self.services);
                }
            }
            NetEvent::RenameSettled {
                notebook_id,
                result,
            } => {
                if self.sources.notebook_id() == Some(notebook_id) {
                    self.sources.on_rename_settled(result);
                }
            }
        }
    }

    fn handle_input(&mut self, event: Event) {
        if self.show_help {
            if let Event::Key(KeyEvent {
                kind: KeyEventKind::Press,
                ..
            }) = event
            {
                self.show_help = false;
            }
            return;
        }

        match self.screen {
            Screen::NotebookList => {
                match self
                    .notebooks
                    .handle_input(&event, &self.services, &self.prefs)
                {
                    NotebooksResult::Open(id, title) => self.open_notebook(id, title),
                    NotebooksResult::Consumed => {}
                    NotebooksResult::NotConsumed => self.handle_global(&event),
                }
            }
            Screen::Notebook => {
                let consumed = match self.pane {
                    Pane::Sources => self.sources.handle_input(&event, &self.services),
                    Pane::Chat => {
                        let selected = self.sources.selected_count();
                        self.chat
                            .handle_input(&event, &self.services, &self.prefs, selected)
                    }
                    Pane::Studio => self.studio.handle_input(&event, &self.services),
                };
                if !consumed {
                    self.handle_global(&event);
                }
            }
        }
    }

    fn handle_global(&mut self, event: &Event) {
        let Event::Key(key) = event else {
            return;
        };
        if let Some(action) = Self::map_global(key) {
            self.apply_action(action);
        }
    }

    /// Global keymap, reached only when the focused view declined the key.
    fn map_global(key: &KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Action::Quit),
                KeyCode::Char('b') => Some(Action::ToggleSources),
                KeyCode::Char('s') => Some(Action::ToggleStudio),
                _ => None,
            };
        }
        match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('?') => Some(Action::ShowHelp),
            KeyCode::Char('t') => Some(Action::ToggleTheme),
            KeyCode::Tab => Some(Action::PaneNext),
            KeyCode::BackTab => Some(Action::PanePrev),
            KeyCode::Esc => Some(Action::BackToNotebooks),
            _ => None,
        }
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
            Action::BackToNotebooks => {
                if self.screen == Screen::Notebook {
                    self.back_to_notebooks();
                }
            }
            Action::PaneNext => {
                if self.screen == Screen::Notebook {
                    self.pane = self.pane.next();
                }
            }
            Action::PanePrev => {
                if self.screen == Screen::Notebook {
                    self.pane = self.pane.prev();
                }
            }
            Action::ToggleSources => {
                let collapsed = self.prefs.prefs().sidebar_collapsed;
                self.prefs.set_sidebar_collapsed(!collapsed);
            }
            Action::ToggleStudio => {
                let collapsed = self.prefs.prefs().studio_collapsed;
                self.prefs.set_studio_collapsed(!collapsed);
            }
            Action::ToggleTheme => {
                self.prefs.toggle_theme();
            }
        }
    }

    fn open_notebook(&mut self, id: i64, title: String) {
        log::info!("Opening notebook {id} ({title})");
        self.notebook_title = title;
        self.screen = Screen::Notebook;
        self.pane = Pane::Chat;
        self.sources.open(id, &self.services);
        self.chat.open(id, &self.prefs);
    }

    fn back_to_notebooks(&mut self) {
        self.chat.close(&self.prefs);
        self.sources.close();
        self.notebook_title.clear();
        self.screen = Screen::NotebookList;
        self.notebooks.load(&self.services);
    }

    /// Add a notification, deduplicating by message and capping the stack.
    fn push_notification(&mut self, mut notification: Notification) {
        if let Some(existing) = self
            .notifications
            .iter_mut()
            .find(|n| n.message == notification.message)
        {
            existing.ttl_ticks = notification.ttl_ticks;
            return;
        }
        self.notification_counter += 1;
        notification.id = self.notification_counter;
        self.notifications.push(notification);
        if self.notifications.len() > MAX_NOTIFICATIONS {
            let overflow = self.notifications.len() - MAX_NOTIFICATIONS;
            self.notifications.drain(..overflow);
        }
    }

    fn on_tick(&mut self) {
        for notification in &mut self.notifications {
            notification.ttl_ticks = notification.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);
    }

    // ── Render ──────────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let pal = palette(self.prefs.theme());
        let area = frame.area();
        frame.render_widget(
            Block::default().style(Style::default().bg(pal.bg_base).fg(pal.text)),
            area,
        );

        let layout = AppLayout::compute(area);
        self.render_header(frame, layout.header, pal);

        match self.screen {
            Screen::NotebookList => self.notebooks.render(frame, layout.content, pal),
            Screen::Notebook => self.render_notebook(frame, layout.content, pal),
        }

        self.render_status(frame, layout.status, pal);
        self.render_notifications(frame, layout.content, pal);
        if self.show_help {
            self.render_help(frame, area, pal);
        }
    }

    fn render_notebook(&self, frame: &mut Frame, content: Rect, pal: &Palette) {
        let prefs = self.prefs.prefs();
        let layout = PanelLayout::compute(content, prefs.sidebar_collapsed, prefs.studio_collapsed);

        if let Some(rect) = layout.sources {
            self.sources.render(
                frame,
                rect,
                pal,
                self.pane == Pane::Sources,
                layout.sources_visibility,
            );
        }
        self.chat.render(
            frame,
            layout.chat,
            pal,
            self.pane == Pane::Chat,
            self.sources.selected_count(),
        );
        if let Some(rect) = layout.studio {
            self.studio.render(
                frame,
                rect,
                pal,
                self.pane == Pane::Studio,
                layout.studio_visibility,
            );
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let mut spans = vec![
            Span::styled(" MetroDoc ", pal.brand_badge()),
            Span::raw(" "),
        ];
        match self.screen {
            Screen::NotebookList => spans.push(Span::styled("Notebooks", pal.title())),
            Screen::Notebook => {
                spans.push(Span::styled(self.notebook_title.clone(), pal.title()));
                let total = self.sources.list.len();
                let selected = self.sources.selected_count();
                spans.push(Span::styled(
                    format!("  {selected} of {total} sources selected"),
                    pal.muted(),
                ));
            }
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let hints = match self.screen {
            Screen::NotebookList => {
                " [Enter]:open  [n]:new  [d]:delete  [t]:theme  [?]:help  [q]:quit".to_string()
            }
            Screen::Notebook => format!(
                " {}  [Tab]:pane  [Esc]:back  [^B]:sources  [^S]:studio  [?]:help  [q]:quit",
                self.pane.label()
            ),
        };
        frame.render_widget(
            Paragraph::new(Line::styled(hints, pal.key_hint())),
            area,
        );
    }

    fn render_notifications(&self, frame: &mut Frame, content: Rect, pal: &Palette) {
        for (idx, notification) in self.notifications.iter().enumerate() {
            let width = (notification.message.len() as u16 + 4)
                .min(content.width.saturating_sub(2))
                .max(10);
            let rect = Rect::new(
                content.right().saturating_sub(width + 1),
                content.y + 1 + idx as u16,
                width,
                1,
            );
            let color = match notification.level {
                NotificationLevel::Info => pal.info,
                NotificationLevel::Success => pal.success,
                NotificationLevel::Warning => pal.warning,
                NotificationLevel::Error => pal.error,
            };
            frame.render_widget(Clear, rect);
            frame.render_widget(
                Paragraph::new(Line::styled(
                    format!(" {} ", notification.message),
                    Style::default().fg(pal.bg_base).bg(color),
                )),
                rect,
            );
        }
    }

    fn render_help(&self, frame: &mut Frame, area: Rect, pal: &Palette) {
        let rect = centered_rect(56, 16, area);
        frame.render_widget(Clear, rect);
        let block = pal.block_focused("Help");
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let entry = |key: &str, what: &str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), pal.heading()),
                Span::raw(what.to_string()),
            ])
        };
        let lines = vec![
            entry("Enter", "open notebook / confirm"),
            entry("n / d", "new / delete notebook"),
            entry("Tab", "next pane"),
            entry("Space", "toggle source selection"),
            entry("a", "toggle all sources"),
            entry("u / e", "upload / rename source"),
            entry("i", "type a chat message"),
            entry("Ctrl+B", "collapse sources panel"),
            entry("Ctrl+S", "collapse studio panel"),
            entry("t", "toggle theme"),
            entry("Esc", "back / cancel"),
            entry("q", "quit"),
            Line::raw(""),
            Line::styled("  press any key to close", pal.dim()),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}
