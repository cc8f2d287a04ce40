//! Terminal surface: named output operations over the output gate.
//!
//! Every escape sequence the engine emits is produced here, resolved against the
//! injected theme. Operations are queued and reach the terminal only through
//! [`Surface::flush`].

use crate::core::key::Direction;
use crate::core::output::{OutputGate, TerminalCmd};
use crate::core::terminal::Terminal;
use crate::core::text::utils::truncate_to_width;
use crate::core::theme::{Role, Theme};

const DEFAULT_WIDTH: usize = 80;

pub struct Surface {
    theme: Theme,
    gate: OutputGate,
    cursor_hidden: bool,
    width: usize,
}

impl Surface {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            gate: OutputGate::new(),
            cursor_hidden: false,
            width: DEFAULT_WIDTH,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_width(&mut self, width: usize) {
        self.width = width.max(1);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn cursor_hidden(&self) -> bool {
        self.cursor_hidden
    }

    pub fn hide_cursor(&mut self) {
        if !self.cursor_hidden {
            self.gate.push(TerminalCmd::HideCursor);
            self.cursor_hidden = true;
        }
    }

    pub fn show_cursor(&mut self) {
        if self.cursor_hidden {
            self.gate.push(TerminalCmd::ShowCursor);
            self.cursor_hidden = false;
        }
    }

    pub fn move_cursor(&mut self, direction: Direction, lines: usize) {
        if lines > 0 {
            self.gate.push(TerminalCmd::MoveCursor(direction, lines));
        }
    }

    pub fn clear_line(&mut self) {
        self.gate.push(TerminalCmd::ClearLine);
    }

    pub fn clear_to_end_of_screen(&mut self) {
        self.gate.push(TerminalCmd::ClearToEnd);
    }

    pub fn colorize(&self, text: &str, role: Role) -> String {
        self.theme.colorize(text, role)
    }

    /// Queue text without a line break. The caller owns wrapping.
    pub fn write(&mut self, text: impl Into<String>) {
        self.gate.push(TerminalCmd::text(text));
    }

    pub fn carriage_return(&mut self) {
        self.gate.push(TerminalCmd::TextStatic("\r"));
    }

    /// Queue one physical row. The text is cut to the terminal width so the
    /// row can never wrap.
    pub fn line(&mut self, text: &str) {
        let fitted = truncate_to_width(text, self.width.saturating_sub(1).max(1), "...");
        self.gate.push(TerminalCmd::Text(fitted));
        self.gate.push(TerminalCmd::TextStatic("\n"));
    }

    pub fn blank_line(&mut self) {
        self.gate.push(TerminalCmd::TextStatic("\n"));
    }

    /// Erase the last `lines` rows printed and leave the cursor where the first
    /// of them began.
    pub fn rewind(&mut self, lines: usize) {
        if lines == 0 {
            return;
        }
        self.carriage_return();
        self.move_cursor(Direction::Up, lines);
        self.clear_to_end_of_screen();
    }

    pub fn flush<T: Terminal + ?Sized>(&mut self, term: &mut T) -> std::io::Result<()> {
        self.gate.flush(term, &self.theme)
    }
}
