use chat_core::llm::PromptClient;
use unicode_segmentation::UnicodeSegmentation;

use super::App;

// `input_cursor` counts graphemes, not bytes.
impl<C: PromptClient + 'static> App<C> {
    fn graphemes(&self) -> Vec<&str> {
        self.input.graphemes(true).collect()
    }

    fn replace_range(&mut self, start: usize, end: usize, with: &str) {
        let parts = self.graphemes();
        let mut next = parts[..start].concat();
        next.push_str(with);
        next.push_str(&parts[end..].concat());
        self.input = next;
    }

    pub fn insert_text(&mut self, s: &str) {
        let at = self.input_cursor.min(self.graphemes().len());
        self.replace_range(at, at, s);
        self.input_cursor = at + s.graphemes(true).count();
    }

    pub fn delete_left_grapheme(&mut self) {
        let at = self.input_cursor.min(self.graphemes().len());
        if at == 0 {
            return;
        }
        self.replace_range(at - 1, at, "");
        self.input_cursor = at - 1;
    }

    pub fn delete_right_grapheme(&mut self) {
        let len = self.graphemes().len();
        let at = self.input_cursor.min(len);
        if at < len {
            self.replace_range(at, at + 1, "");
        }
    }

    pub fn move_cursor_right(&mut self) {
        self.input_cursor = (self.input_cursor + 1).min(self.graphemes().len());
    }

    pub fn move_cursor_line_start(&mut self) {
        let parts = self.graphemes();
        let at = self.input_cursor.min(parts.len());
        self.input_cursor = parts[..at].iter().rposition(|g| *g == "\n").map_or(0, |p| p + 1);
    }

    pub fn move_cursor_line_end(&mut self) {
        let parts = self.graphemes();
        let at = self.input_cursor.min(parts.len());
        self.input_cursor = parts[at..]
            .iter()
            .position(|g| *g == "\n")
            .map_or(parts.len(), |p| at + p);
    }

    fn word_start_before(&self, at: usize) -> usize {
        let parts = self.graphemes();
        let mut i = at.min(parts.len());
        while i > 0 && parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        while i > 0 && !parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        i
    }

    pub fn move_cursor_word_left(&mut self) {
        self.input_cursor = self.word_start_before(self.input_cursor);
    }

    pub fn move_cursor_word_right(&mut self) {
        let parts = self.graphemes();
        let mut i = self.input_cursor.min(parts.len());
        while i < parts.len() && parts[i].trim().is_empty() {
            i += 1;
        }
        while i < parts.len() && !parts[i].trim().is_empty() {
            i += 1;
        }
        self.input_cursor = i;
    }

    pub fn delete_prev_word(&mut self) {
        let end = self.input_cursor.min(self.graphemes().len());
        let start = self.word_start_before(end);
        self.replace_range(start, end, "");
        self.input_cursor = start;
    }

    pub fn kill_to_line_start(&mut self) {
        let end = self.input_cursor.min(self.graphemes().len());
        self.move_cursor_line_start();
        let start = self.input_cursor;
        self.replace_range(start, end, "");
    }
}
