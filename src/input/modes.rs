//! Input Modes
//!
//! Modal editing states and the single-line text buffer used by the
//! insert and search modes.

/// Input mode enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Navigation and structural commands
    #[default]
    Normal,
    /// Focused cell is directly editable
    Insert,
    /// Typing a search query (/)
    Search,
}

impl Mode {
    /// Get mode indicator for status line
    pub fn indicator(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Search => "SEARCH",
        }
    }
}

/// Where the caret lands when a text input is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caret {
    Start,
    End,
}

/// Single-line text buffer with a caret.
///
/// The cursor counts characters, not bytes.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    buffer: String,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load contents and place the caret
    pub fn load(&mut self, content: &str, caret: Caret) {
        self.buffer = content.to_string();
        self.cursor = match caret {
            Caret::Start => 0,
            Caret::End => self.char_len(),
        };
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_idx)
            .map_or(self.buffer.len(), |(i, _)| i)
    }

    /// Insert character at cursor
    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor (backspace)
    pub fn delete_char(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.buffer.remove(at);
        true
    }

    /// Delete character at cursor (delete key)
    pub fn delete_char_forward(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.buffer.remove(at);
        true
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input() {
        let mut input = TextInput::new();
        for c in "hello".chars() {
            input.insert_char(c);
        }
        assert_eq!(input.as_str(), "hello");
        assert_eq!(input.cursor(), 5);

        input.delete_char();
        assert_eq!(input.as_str(), "hell");
    }

    #[test]
    fn test_load_caret() {
        let mut input = TextInput::new();
        input.load("bike", Caret::End);
        assert_eq!(input.cursor(), 4);
        input.load("bike", Caret::Start);
        assert_eq!(input.cursor(), 0);
        input.insert_char('e');
        assert_eq!(input.as_str(), "ebike");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = TextInput::new();
        input.load("café", Caret::End);
        input.cursor_left();
        input.delete_char_forward();
        assert_eq!(input.as_str(), "caf");
        input.insert_char('é');
        input.cursor_home();
        input.delete_char();
        assert_eq!(input.as_str(), "café");
    }

    #[test]
    fn test_cursor_movement() {
        let mut input = TextInput::new();
        input.load("hello", Caret::Start);

        input.cursor_end();
        assert_eq!(input.cursor(), 5);
        input.cursor_right();
        assert_eq!(input.cursor(), 5);
        input.cursor_left();
        assert_eq!(input.cursor(), 4);
        input.cursor_home();
        assert_eq!(input.cursor(), 0);
        input.cursor_left();
        assert_eq!(input.cursor(), 0);
    }
}
