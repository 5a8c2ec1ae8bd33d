use crate::api::types::{Notebook, SourceFile};

/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick for notification TTLs.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// Completed backend task.
    Net(NetEvent),
    /// Delayed demo chat reply (or opening greeting) for a notebook.
    ChatReply { notebook_id: i64, content: String },
    /// Notification to display to the user.
    Notification(Notification),
    /// Request to quit the application.
    Quit,
}

/// Results of async backend tasks, reported back into the event loop.
/// Errors carry display-ready messages; the taxonomy lives in the api
/// and workflow layers.
#[derive(Debug, Clone)]
pub enum NetEvent {
    /// Notebook list fetch settled.
    Notebooks(Result<Vec<Notebook>, String>),
    /// A notebook was created (errors arrive as notifications only).
    NotebookCreated(Notebook),
    /// A notebook was deleted.
    NotebookDeleted(i64),
    /// Fresh source list from an explicit fetch. `token` is the load
    /// generation claimed when the fetch was issued; stale tokens are
    /// discarded on receipt.
    Sources {
        notebook_id: i64,
        token: u64,
        result: Result<Vec<SourceFile>, String>,
    },
    /// Reconciling re-fetch of a settled upload or delete. Applied
    /// unconditionally, superseding any load still in flight; a failed
    /// mutation publishes nothing and leaves pending loads alone.
    SourcesRefreshed {
        notebook_id: i64,
        sources: Vec<SourceFile>,
    },
    /// A rename commit settled. `Ok(None)` means the no-op guard skipped
    /// it; `Ok(Some(_))` carries the reconciling re-fetch; `Err` obliges
    /// the view to roll the displayed name back.
    RenameSettled {
        notebook_id: i64,
        result: Result<Option<Vec<SourceFile>>, String>,
    },
}

/// High-level actions dispatched by the global input mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    BackToNotebooks,
    PaneNext,
    PanePrev,

    // Panels
    ToggleSources,
    ToggleStudio,
    ToggleTheme,

    // Modals
    ShowHelp,
    CloseHelp,

    // Application
    Quit,
}

/// Panes of the notebook screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Sources,
    Chat,
    Studio,
}

impl Pane {
    pub const ALL: [Pane; 3] = [Pane::Sources, Pane::Chat, Pane::Studio];

    pub fn label(self) -> &'static str {
        match self {
            Pane::Sources => "Sources",
            Pane::Chat => "Chat",
            Pane::Studio => "Studio",
        }
    }

    pub fn next(self) -> Pane {
        let idx = Pane::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Pane::ALL[(idx + 1) % Pane::ALL.len()]
    }

    pub fn prev(self) -> Pane {
        let idx = Pane::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Pane::ALL[(idx + Pane::ALL.len() - 1) % Pane::ALL.len()]
    }
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}

impl Notification {
    /// Build an unassigned notification; the app assigns the id.
    pub fn new(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            id: 0,
            message: message.into(),
            level,
            ttl_ticks: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pane_cycle_roundtrip() {
        for pane in Pane::ALL {
            assert_eq!(pane.next().prev(), pane);
        }
    }

    #[test]
    fn test_pane_next_wraps() {
        assert_eq!(Pane::Studio.next(), Pane::Sources);
        assert_eq!(Pane::Sources.prev(), Pane::Studio);
    }
}
