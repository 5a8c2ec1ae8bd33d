//! Client-persisted preferences and chat transcripts.
//!
//! The terminal analog of the browser's `localStorage`: a `prefs.json`
//! under the data directory for UI state (`theme`, sidebar and studio
//! collapse), plus one `chat_{id}.json` transcript per notebook.
//! Transcripts are read back when a notebook opens and removed when the
//! notebook is deleted.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::chat::Transcript;

/// Color theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Persisted UI preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefs {
    pub theme: Theme,
    pub sidebar_collapsed: bool,
    pub studio_collapsed: bool,
}

/// File-backed store for [`Prefs`] and per-notebook chat transcripts.
#[derive(Debug, Clone)]
pub struct PrefsStore {
    dir: PathBuf,
    prefs: Prefs,
}

impl PrefsStore {
    /// Open the store in `dir`, creating it if needed. A missing or
    /// unparseable prefs file falls back to defaults.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(e) = fs::create_dir_all(&dir) {
            log::warn!("Failed to create prefs directory {}: {e}", dir.display());
        }

        let prefs_path = dir.join("prefs.json");
        let prefs = match fs::read_to_string(&prefs_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(prefs) => prefs,
                Err(e) => {
                    log::warn!(
                        "Failed to parse prefs at {}: {e} - using defaults",
                        prefs_path.display()
                    );
                    Prefs::default()
                }
            },
            Err(_) => Prefs::default(),
        };

        Self { dir, prefs }
    }

    pub fn prefs(&self) -> &Prefs {
        &self.prefs
    }

    pub fn theme(&self) -> Theme {
        self.prefs.theme
    }

    /// Toggle the theme and persist. Returns the new theme.
    pub fn toggle_theme(&mut self) -> Theme {
        self.prefs.theme = self.prefs.theme.toggled();
        self.save();
        self.prefs.theme
    }

    pub fn set_sidebar_collapsed(&mut self, collapsed: bool) {
        self.prefs.sidebar_collapsed = collapsed;
        self.save();
    }

    pub fn set_studio_collapsed(&mut self, collapsed: bool) {
        self.prefs.studio_collapsed = collapsed;
        self.save();
    }

    /// Best-effort write; a failed save costs one session of preferences.
    fn save(&self) {
        let path = self.dir.join("prefs.json");
        let result = serde_json::to_string_pretty(&self.prefs)
            .map_err(io::Error::other)
            .and_then(|json| fs::write(&path, json));
        if let Err(e) = result {
            log::warn!("Failed to save prefs to {}: {e}", path.display());
        }
    }

    // ── Chat transcripts ────────────────────────────────────────────────

    fn chat_path(&self, notebook_id: i64) -> PathBuf {
        self.dir.join(format!("chat_{notebook_id}.json"))
    }

    /// Load the transcript for a notebook, if one was saved.
    pub fn load_chat(&self, notebook_id: i64) -> Option<Transcript> {
        let path = self.chat_path(notebook_id);
        let contents = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(transcript) => Some(transcript),
            Err(e) => {
                log::warn!("Discarding corrupt transcript {}: {e}", path.display());
                None
            }
        }
    }

    /// Persist a notebook's transcript.
    pub fn save_chat(&self, notebook_id: i64, transcript: &Transcript) -> io::Result<()> {
        let json = serde_json::to_string(transcript).map_err(io::Error::other)?;
        fs::write(self.chat_path(notebook_id), json)
    }

    /// Remove a notebook's transcript (after notebook deletion).
    pub fn remove_chat(&self, notebook_id: i64) -> io::Result<()> {
        match fs::remove_file(self.chat_path(notebook_id)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_dir_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let store = PrefsStore::open(tmp.path().join("fresh"));
        assert_eq!(store.theme(), Theme::Dark);
        assert!(!store.prefs().sidebar_collapsed);
    }

    #[test]
    fn test_theme_toggle_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = PrefsStore::open(tmp.path());
        assert_eq!(store.toggle_theme(), Theme::Light);

        let reopened = PrefsStore::open(tmp.path());
        assert_eq!(reopened.theme(), Theme::Light);
    }

    #[test]
    fn test_chat_save_load_remove() {
        let tmp = tempfile::tempdir().unwrap();
        let store = PrefsStore::open(tmp.path());

        let mut transcript = Transcript::new();
        transcript.push_user("hello");
        store.save_chat(42, &transcript).unwrap();

        let loaded = store.load_chat(42).unwrap();
        assert_eq!(loaded.len(), 1);

        store.remove_chat(42).unwrap();
        assert!(store.load_chat(42).is_none());
        // Removing again is not an error.
        store.remove_chat(42).unwrap();
    }

    #[test]
    fn test_corrupt_prefs_fall_back() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("prefs.json"), "not json").unwrap();
        let store = PrefsStore::open(tmp.path());
        assert_eq!(store.theme(), Theme::Dark);
    }
}
