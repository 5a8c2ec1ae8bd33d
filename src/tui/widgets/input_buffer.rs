//! Shared text input buffer with cursor and selection management.
//!
//! Used by the chat input, modal text fields, and the inline rename
//! editor. The selection span exists for rename's pre-selected base
//! name: the first insertion replaces the span, matching
//! select-then-type editing.

/// A text input buffer with cursor positioning and an optional
/// selection span (byte range).
pub struct InputBuffer {
    content: String,
    cursor: usize,
    selection: Option<(usize, usize)>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self {
            content: String::new(),
            cursor: 0,
            selection: None,
        }
    }

    /// Buffer pre-filled with `text`, cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let content = text.into();
        let cursor = content.len();
        Self {
            content,
            cursor,
            selection: None,
        }
    }

    /// Buffer pre-filled with a filename, its base name (everything
    /// before the final `.`) selected for replacement. A leading-dot
    /// name like `.env` selects the whole name.
    pub fn with_selected_stem(name: &str) -> Self {
        let stem_len = match name.rfind('.') {
            Some(0) | None => name.len(),
            Some(idx) => idx,
        };
        Self {
            content: name.to_string(),
            cursor: stem_len,
            selection: if stem_len > 0 { Some((0, stem_len)) } else { None },
        }
    }

    /// Remove the selected span, leaving the cursor at its start.
    fn delete_selection(&mut self) -> bool {
        if let Some((start, end)) = self.selection.take() {
            self.content.drain(start..end);
            self.cursor = start;
            true
        } else {
            false
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.delete_selection();
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.delete_selection() {
            return;
        }
        if self.cursor > 0 {
            let prev = self.content[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.content.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.delete_selection() {
            return;
        }
        if self.cursor < self.content.len() {
            let next = self.content[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.content.len());
            self.content.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        if let Some((start, _)) = self.selection.take() {
            self.cursor = start;
            return;
        }
        if self.cursor > 0 {
            self.cursor = self.content[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_right(&mut self) {
        if let Some((_, end)) = self.selection.take() {
            self.cursor = end;
            return;
        }
        if self.cursor < self.content.len() {
            self.cursor = self.content[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.content.len());
        }
    }

    pub fn move_home(&mut self) {
        self.selection = None;
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.selection = None;
        self.cursor = self.content.len();
    }

    /// Take the content out, resetting the buffer.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        self.selection = None;
        std::mem::take(&mut self.content)
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
        self.selection = None;
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Active selection span (byte range), if any.
    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new()
    }
}
