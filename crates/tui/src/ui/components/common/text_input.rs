//! UTF-8 safe text buffer with cursor management.
//!
//! Shared by the single-line and multi-line suggestion fields. Line breaks are
//! plain `\n` characters; Home/End operate on the line holding the cursor.

#[derive(Clone, Debug, Default)]
pub struct TextInputState {
    /// The underlying text buffer
    input: String,
    /// Cursor byte index into `input` (always on a UTF-8 boundary)
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    // ----- Getters -----
    pub fn input(&self) -> &str {
        &self.input
    }
    pub fn cursor(&self) -> usize {
        self.cursor
    }
    pub fn is_blank(&self) -> bool {
        self.input.trim().is_empty()
    }

    // ----- Setters -----

    /// Replace the buffer when it differs, placing the cursor at the end.
    ///
    /// Returns `true` when the text changed.
    pub fn sync(&mut self, value: &str) -> bool {
        if self.input == value {
            return false;
        }
        self.input = value.to_string();
        self.cursor = self.input.len();
        true
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        let mut cursor = cursor.min(self.input.len());
        while !self.input.is_char_boundary(cursor) {
            cursor -= 1;
        }
        self.cursor = cursor;
    }

    // ----- Editing primitives (UTF-8 safe) -----

    /// Move cursor one Unicode scalar to the left.
    pub fn move_left(&mut self) {
        if let Some(previous) = self.input[..self.cursor].chars().next_back() {
            self.cursor -= previous.len_utf8();
        }
    }

    /// Move cursor one Unicode scalar to the right.
    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    /// Move to the start of the current line.
    pub fn move_home(&mut self) {
        self.cursor = self.input[..self.cursor].rfind('\n').map_or(0, |index| index + 1);
    }

    /// Move to the end of the current line.
    pub fn move_end(&mut self) {
        self.cursor = self.input[self.cursor..]
            .find('\n')
            .map_or(self.input.len(), |offset| self.cursor + offset);
    }

    /// Insert a char at the cursor.
    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Remove the char immediately before the cursor. Returns `true` when
    /// something was removed.
    pub fn backspace(&mut self) -> bool {
        let Some(previous) = self.input[..self.cursor].chars().next_back() else {
            return false;
        };
        let start = self.cursor - previous.len_utf8();
        self.input.drain(start..self.cursor);
        self.cursor = start;
        true
    }

    /// Remove the char under the cursor. Returns `true` when something was
    /// removed.
    pub fn delete(&mut self) -> bool {
        let Some(next) = self.input[self.cursor..].chars().next() else {
            return false;
        };
        self.input.drain(self.cursor..self.cursor + next.len_utf8());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_move_insert_backspace() {
        let mut state = TextInputState::new();
        state.sync("Kįunas");
        state.set_cursor(1);
        state.move_right();
        assert!(state.backspace());
        assert_eq!(state.input(), "Kunas");
        state.move_left();
        state.insert_char('a');
        assert_eq!(state.input(), "aKunas");
        state.move_left();
        assert!(!state.backspace());
    }

    #[test]
    fn delete_removes_char_under_cursor() {
        let mut state = TextInputState::new();
        state.sync("ąb");
        state.set_cursor(0);
        assert!(state.delete());
        assert_eq!(state.input(), "b");
        state.move_end();
        assert!(!state.delete());
    }

    #[test]
    fn home_and_end_are_line_aware() {
        let mut state = TextInputState::new();
        state.sync("first\nsecond");
        state.set_cursor(8);
        state.move_home();
        assert_eq!(state.cursor(), 6);
        state.move_end();
        assert_eq!(state.cursor(), "first\nsecond".len());
        state.set_cursor(2);
        state.move_end();
        assert_eq!(state.cursor(), 5);
    }

    #[test]
    fn sync_moves_cursor_to_end_only_on_change() {
        let mut state = TextInputState::new();
        state.sync("Vil");
        state.set_cursor(1);
        assert!(!state.sync("Vil"));
        assert_eq!(state.cursor(), 1);
        assert!(state.sync("Vilnius"));
        assert_eq!(state.cursor(), "Vilnius".len());
    }

    #[test]
    fn set_cursor_snaps_to_char_boundary() {
        let mut state = TextInputState::new();
        state.sync("ž");
        state.set_cursor(1);
        assert_eq!(state.cursor(), 0);
    }
}
