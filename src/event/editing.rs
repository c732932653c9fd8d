//! Text editing for entries and text boxes.
//!
//! [`TextCursor`] pairs a value with a cursor measured in characters, so
//! every operation is char-boundary safe. The cursor is clamped into
//! `0..=len` after each operation.

/// A text value with a cursor position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextCursor {
    value: String,
    cursor: usize,
}

impl TextCursor {
    /// Wrap `value` with the cursor clamped into range.
    pub fn new(value: impl Into<String>, cursor: usize) -> Self {
        let value = value.into();
        let cursor = cursor.min(value.chars().count());
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn into_value(self) -> String {
        self.value
    }

    /// The cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Byte offset of the character at `index` (the end for `len`).
    fn byte_offset(&self, index: usize) -> usize {
        self.value
            .char_indices()
            .nth(index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    /// Type a character. In overwrite mode the character under the cursor
    /// is replaced; at the end of the text it is appended either way.
    pub fn insert_char(&mut self, ch: char, overwrite: bool) {
        let at = self.byte_offset(self.cursor);
        if overwrite && self.cursor < self.len() {
            let next = self.byte_offset(self.cursor + 1);
            self.value.replace_range(at..next, ch.encode_utf8(&mut [0; 4]));
        } else {
            self.value.insert(at, ch);
        }
        self.cursor += 1;
    }

    /// Append `s` at the end and move the cursor there.
    pub fn append(&mut self, s: &str) {
        self.value.push_str(s);
        self.cursor = self.len();
    }

    /// Delete the character before the cursor. Returns whether anything
    /// was removed.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = self.byte_offset(self.cursor - 1);
        let end = self.byte_offset(self.cursor);
        self.value.replace_range(start..end, "");
        self.cursor -= 1;
        true
    }

    /// Delete the character at the cursor. Returns whether anything was
    /// removed.
    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        let start = self.byte_offset(self.cursor);
        let end = self.byte_offset(self.cursor + 1);
        self.value.replace_range(start..end, "");
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }
}

/// First visible character of a one-line field `width` cells wide, chosen
/// so the cursor stays in view.
pub fn scroll_start(len: usize, cursor: usize, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    let by_cursor = (cursor + 1).saturating_sub(width);
    let by_len = len.saturating_sub(width);
    by_cursor.min(by_len)
}
