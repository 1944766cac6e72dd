//! In-memory document that applies keyboard commands and dictation.
//!
//! This is the host side of the two channels: edit commands from the
//! keyboard are applied in the order they arrive, and dictated fragments are
//! normalized against the text before the cursor and inserted there.

use dictapad_core::{EditCommand, Language};

use crate::normalize::normalize;

/// Document text with a cursor.
///
/// The cursor is kept as a byte offset on a char boundary internally and
/// exposed as a char index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    text: String,
    cursor: usize,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// A document holding `text`, with the cursor at the end.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Cursor position in chars from the start.
    pub fn cursor(&self) -> usize {
        self.text[..self.cursor].chars().count()
    }

    /// Move the cursor to char index `position`, clamped to the end.
    pub fn set_cursor(&mut self, position: usize) {
        self.cursor = self
            .text
            .char_indices()
            .nth(position)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len());
    }

    /// Text before the cursor: the context for the next dictated fragment.
    pub fn before_cursor(&self) -> &str {
        &self.text[..self.cursor]
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Apply one keyboard command at the cursor.
    pub fn apply(&mut self, command: &EditCommand) {
        match command {
            EditCommand::Char(c) => self.insert_char(*c),
            EditCommand::Space => self.insert_char(' '),
            EditCommand::Enter => self.insert_char('\n'),
            EditCommand::Backspace => self.delete_char(),
            EditCommand::DeleteWord => self.delete_word(),
            EditCommand::ToggleCase => self.toggle_case(),
        }
        tracing::trace!(%command, cursor = self.cursor, "Command applied");
    }

    /// Normalize `fragment` against the text before the cursor and insert it.
    ///
    /// Returns the text that was inserted.
    pub fn insert_dictation(&mut self, fragment: &str, language: Language) -> String {
        let normalized = normalize(fragment, self.before_cursor(), language);
        self.insert_str(&normalized);
        normalized
    }

    fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn delete_char(&mut self) {
        if let Some((start, _)) = self.before_cursor().char_indices().next_back() {
            self.text.replace_range(start..self.cursor, "");
            self.cursor = start;
        }
    }

    fn delete_word(&mut self) {
        let start = self.word_start();
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    /// Flip the case of the first letter of the last word before the cursor.
    fn toggle_case(&mut self) {
        let start = self.word_start();
        let Some(first) = self.text[start..self.cursor].chars().next() else {
            return;
        };
        if first.is_whitespace() {
            return;
        }

        let flipped: String = if first.is_lowercase() {
            first.to_uppercase().collect()
        } else if first.is_uppercase() {
            first.to_lowercase().collect()
        } else {
            return;
        };

        let end = start + first.len_utf8();
        self.text.replace_range(start..end, &flipped);
        self.cursor = self.cursor - first.len_utf8() + flipped.len();
    }

    /// Byte offset where the last word before the cursor starts, skipping
    /// whitespace between that word and the cursor.
    fn word_start(&self) -> usize {
        let before = self.before_cursor();
        let word_end = before.trim_end().len();
        before[..word_end]
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(idx, c)| idx + c.len_utf8())
            .unwrap_or(0)
    }
}
