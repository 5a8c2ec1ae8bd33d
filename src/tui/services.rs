use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::{NotebookApi, NotebookClient};
use crate::config::AppConfig;

use super::events::{AppEvent, Notification, NotificationLevel};

/// Centralized handle to the backend client and the event channel.
///
/// Created once at startup, then passed by reference to views; spawned
/// tasks clone the `Arc`'d client and the sender.
pub struct Services {
    pub api: Arc<dyn NotebookApi>,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    pub fn init(config: &AppConfig, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        let client = NotebookClient::from_config(&config.server);
        log::info!("Notebook client initialized for {}", client.base_url());
        Self {
            api: Arc::new(client),
            event_tx,
        }
    }

    /// Build directly from an API handle (tests).
    pub fn with_api(api: Arc<dyn NotebookApi>, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { api, event_tx }
    }

    /// Queue a notification for the overlay.
    pub fn notify(&self, message: impl Into<String>, level: NotificationLevel) {
        let _ = self
            .event_tx
            .send(AppEvent::Notification(Notification::new(message, level)));
    }
}

/// Send a notification from a spawned task.
pub fn notify_from_task(
    tx: &mpsc::UnboundedSender<AppEvent>,
    message: impl Into<String>,
    level: NotificationLevel,
) {
    let _ = tx.send(AppEvent::Notification(Notification::new(message, level)));
}
