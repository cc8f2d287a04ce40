//! Single-line text input read key by key in raw mode.
//!
//! Reading through the decoder (instead of a cooked `read_line`) keeps Ctrl-C
//! visible as the interrupt byte while the user is typing.

use crate::core::key::{Direction, KeyEvent};
use crate::core::text::utils::grapheme_segments;
use crate::core::text::width::visible_width;
use crate::error::InteractionError;
use crate::render::Surface;
use crate::runtime::Console;

/// Editable buffer with a byte cursor that always sits on a grapheme boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    value: String,
    cursor: usize,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    /// Remove the grapheme before the cursor.
    pub fn backspace(&mut self) {
        if let Some(last) = grapheme_segments(&self.value[..self.cursor]).next_back() {
            let start = self.cursor - last.len();
            self.value.replace_range(start..self.cursor, "");
            self.cursor = start;
        }
    }

    pub fn move_left(&mut self) {
        if let Some(last) = grapheme_segments(&self.value[..self.cursor]).next_back() {
            self.cursor -= last.len();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = grapheme_segments(&self.value[self.cursor..]).next() {
            self.cursor += next.len();
        }
    }

    /// Apply one key. Returns `true` when the key submits the line.
    pub fn apply(&mut self, key: KeyEvent) -> bool {
        match key {
            KeyEvent::Enter => return true,
            key if key.is_backspace() => self.backspace(),
            KeyEvent::Char(ch) if !ch.is_control() => self.insert(ch),
            KeyEvent::Digit(ch) => self.insert(ch),
            KeyEvent::Space => self.insert(' '),
            KeyEvent::Nav(Direction::Left) => self.move_left(),
            KeyEvent::Nav(Direction::Right) => self.move_right(),
            _ => {}
        }
        false
    }

    /// Cells between the cursor and the end of the text.
    fn tail_width(&self) -> usize {
        visible_width(&self.value[self.cursor..])
    }
}

/// A submitted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    /// Trimmed text.
    pub text: String,
    /// Terminal rows the prompt and the raw text occupied, wrapping included.
    pub rows: usize,
}

/// Print `prompt` and collect one line. Escape and vertical arrows are
/// ignored; Ctrl-C cancels.
pub fn read_line(console: &mut Console, prompt: &str) -> Result<String, InteractionError> {
    read_line_counted(console, prompt).map(|submitted| submitted.text)
}

/// [`read_line`], also reporting how many rows the input used so callers can
/// erase it exactly.
pub fn read_line_counted(
    console: &mut Console,
    prompt: &str,
) -> Result<Submitted, InteractionError> {
    let mut editor = LineEditor::new();
    let prompt_width = visible_width(prompt);
    let surface = console.surface();
    surface.write(prompt);
    let mut cursor_row = last_row(prompt_width, surface.width());

    loop {
        let key = console.read_key()?;
        let submitted = editor.apply(key);
        let surface = console.surface();
        if submitted {
            let end_row = last_row(prompt_width + visible_width(editor.value()), surface.width());
            surface.move_cursor(Direction::Down, end_row.saturating_sub(cursor_row));
            surface.blank_line();
            console.flush()?;
            return Ok(Submitted {
                text: editor.value().trim().to_string(),
                rows: end_row + 1,
            });
        }
        cursor_row = repaint(surface, prompt, &editor, cursor_row);
    }
}

/// Row, counted from the prompt's first row, that the terminal cursor rests on
/// after `cells` cells were printed. Filling a row exactly leaves the cursor on
/// it until the next glyph wraps.
fn last_row(cells: usize, width: usize) -> usize {
    cells.saturating_sub(1) / width.max(1)
}

/// Redraw the prompt and text from the prompt's first row, then park the
/// cursor at the edit position. Returns the row the cursor ends on.
fn repaint(surface: &mut Surface, prompt: &str, editor: &LineEditor, cursor_row: usize) -> usize {
    let width = surface.width().max(1);
    let end = visible_width(prompt) + visible_width(editor.value());
    let at = end.saturating_sub(editor.tail_width());

    surface.carriage_return();
    surface.move_cursor(Direction::Up, cursor_row);
    surface.clear_to_end_of_screen();
    surface.write(format!("{prompt}{}", editor.value()));

    let end_row = last_row(end, width);
    if at == end {
        return end_row;
    }
    let row = at / width;
    surface.carriage_return();
    surface.move_cursor(Direction::Up, end_row.saturating_sub(row));
    surface.move_cursor(Direction::Right, at % width);
    row
}

#[cfg(test)]
mod tests {
    use super::{last_row, LineEditor};
    use crate::core::key::{Direction, KeyEvent};

    fn typed(keys: &[KeyEvent]) -> LineEditor {
        let mut editor = LineEditor::new();
        for key in keys {
            editor.apply(*key);
        }
        editor
    }

    #[test]
    fn typing_appends_and_backspace_removes() {
        let editor = typed(&[
            KeyEvent::Char('a'),
            KeyEvent::Char('b'),
            KeyEvent::Space,
            KeyEvent::Digit('1'),
            KeyEvent::Char('\u{7f}'),
        ]);
        assert_eq!(editor.value(), "ab ");
    }

    #[test]
    fn insertion_happens_at_cursor() {
        let editor = typed(&[
            KeyEvent::Char('a'),
            KeyEvent::Char('c'),
            KeyEvent::Nav(Direction::Left),
            KeyEvent::Char('b'),
        ]);
        assert_eq!(editor.value(), "abc");
        assert_eq!(editor.cursor(), 2);
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let mut editor = LineEditor::new();
        for ch in "e\u{301}x".chars() {
            editor.insert(ch);
        }
        editor.move_left();
        editor.backspace();
        assert_eq!(editor.value(), "x");
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn control_and_navigation_keys_do_not_edit() {
        let editor = typed(&[
            KeyEvent::Char('a'),
            KeyEvent::Escape,
            KeyEvent::Nav(Direction::Up),
            KeyEvent::Char('\u{1}'),
            KeyEvent::Unknown,
        ]);
        assert_eq!(editor.value(), "a");
    }

    #[test]
    fn enter_submits() {
        let mut editor = LineEditor::new();
        assert!(!editor.apply(KeyEvent::Char('x')));
        assert!(editor.apply(KeyEvent::Enter));
    }

    #[test]
    fn last_row_keeps_an_exactly_filled_row() {
        assert_eq!(last_row(0, 10), 0);
        assert_eq!(last_row(10, 10), 0);
        assert_eq!(last_row(11, 10), 1);
        assert_eq!(last_row(25, 10), 2);
    }

    #[test]
    fn cursor_clamps_at_edges() {
        let mut editor = typed(&[KeyEvent::Char('a')]);
        editor.move_right();
        assert_eq!(editor.cursor(), 1);
        editor.move_left();
        editor.move_left();
        assert_eq!(editor.cursor(), 0);
        editor.backspace();
        assert_eq!(editor.value(), "a");
    }
}
