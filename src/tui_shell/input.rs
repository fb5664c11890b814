/// Single-line text capture for prompts. `cursor` counts characters, not bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(in crate::tui_shell) struct Input {
    pub(in crate::tui_shell) buf: String,
    pub(in crate::tui_shell) cursor: usize,
}

impl Input {
    pub(in crate::tui_shell) fn with_text(s: &str) -> Self {
        let mut input = Self::default();
        input.set(s.to_string());
        input
    }

    fn byte_at(&self, cursor: usize) -> usize {
        self.buf
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.buf.len())
    }

    fn char_len(&self) -> usize {
        self.buf.chars().count()
    }

    pub(in crate::tui_shell) fn insert_char(&mut self, c: char) {
        let at = self.byte_at(self.cursor);
        self.buf.insert(at, c);
        self.cursor += 1;
    }

    pub(in crate::tui_shell) fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_at(self.cursor);
        self.buf.remove(at);
    }

    pub(in crate::tui_shell) fn delete(&mut self) {
        if self.cursor >= self.char_len() {
            return;
        }
        let at = self.byte_at(self.cursor);
        self.buf.remove(at);
    }

    pub(in crate::tui_shell) fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub(in crate::tui_shell) fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub(in crate::tui_shell) fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub(in crate::tui_shell) fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub(in crate::tui_shell) fn set(&mut self, s: String) {
        self.buf = s;
        self.cursor = self.char_len();
    }

    pub(in crate::tui_shell) fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buf)
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/input_tests.rs"]
mod tests;
