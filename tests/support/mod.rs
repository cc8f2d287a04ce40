#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use zmenu::{ByteRead, Console, Terminal, Theme};

pub const UP: &str = "\x1b[A";
pub const DOWN: &str = "\x1b[B";
pub const RIGHT: &str = "\x1b[C";
pub const LEFT: &str = "\x1b[D";
pub const ENTER: &str = "\r";
pub const SPACE: &str = " ";
pub const CTRL_C: &str = "\x03";
pub const BACKSPACE: &str = "\x7f";

#[derive(Default)]
struct State {
    input: VecDeque<Option<u8>>,
    output: String,
    raw: bool,
    raw_entries: usize,
    restores: usize,
    signal_when_drained: bool,
    columns: Option<u16>,
}

const DEFAULT_COLUMNS: u16 = 100;

/// In-memory terminal fed from a key script. Clones share state, so a test can
/// keep a handle after moving one into a [`Console`].
#[derive(Clone, Default)]
pub struct ScriptedTerminal(Rc<RefCell<State>>);

impl ScriptedTerminal {
    pub fn new(keys: &[&str]) -> Self {
        let term = Self::default();
        term.push_keys(keys);
        term
    }

    pub fn push_keys(&self, keys: &[&str]) {
        let mut state = self.0.borrow_mut();
        for key in keys {
            state.input.extend(key.bytes().map(Some));
        }
    }

    /// Report a narrower (or wider) terminal than the default.
    pub fn with_columns(self, columns: u16) -> Self {
        self.0.borrow_mut().columns = Some(columns);
        self
    }

    /// A gap the decoder sees as "no byte within the ESC grace window".
    pub fn push_pause(&self) {
        self.0.borrow_mut().input.push_back(None);
    }

    /// Report a delivered signal once the script is used up.
    pub fn signal_when_drained(&self) {
        self.0.borrow_mut().signal_when_drained = true;
    }

    pub fn output(&self) -> String {
        self.0.borrow().output.clone()
    }

    pub fn remaining_input(&self) -> usize {
        self.0.borrow().input.iter().filter(|byte| byte.is_some()).count()
    }

    pub fn is_raw(&self) -> bool {
        self.0.borrow().raw
    }

    pub fn raw_entries(&self) -> usize {
        self.0.borrow().raw_entries
    }

    pub fn restores(&self) -> usize {
        self.0.borrow().restores
    }

    pub fn screen(&self) -> Vec<String> {
        render_screen_at_width(&self.output(), usize::from(self.columns()))
    }
}

impl Terminal for ScriptedTerminal {
    fn enable_raw_mode(&mut self) -> std::io::Result<()> {
        let mut state = self.0.borrow_mut();
        state.raw = true;
        state.raw_entries += 1;
        Ok(())
    }

    fn restore_mode(&mut self) -> std::io::Result<()> {
        let mut state = self.0.borrow_mut();
        state.raw = false;
        state.restores += 1;
        Ok(())
    }

    fn read_byte(&mut self, _timeout: Option<Duration>) -> std::io::Result<ByteRead> {
        Ok(match self.0.borrow_mut().input.pop_front() {
            Some(Some(byte)) => ByteRead::Byte(byte),
            Some(None) => ByteRead::Timeout,
            None => ByteRead::Eof,
        })
    }

    fn write(&mut self, data: &str) -> std::io::Result<()> {
        self.0.borrow_mut().output.push_str(data);
        Ok(())
    }

    fn columns(&self) -> u16 {
        self.0.borrow().columns.unwrap_or(DEFAULT_COLUMNS)
    }

    fn interrupted(&self) -> bool {
        let state = self.0.borrow();
        state.signal_when_drained && state.input.is_empty()
    }
}

/// Console over a scripted terminal with the ANSI theme and no pause after
/// actions.
pub fn console(keys: &[&str]) -> (Console, ScriptedTerminal) {
    console_on(ScriptedTerminal::new(keys))
}

pub fn console_on(term: ScriptedTerminal) -> (Console, ScriptedTerminal) {
    let console = Console::new(term.clone(), Theme::ansi()).with_pause_after_action(false);
    (console, term)
}

/// Replay terminal output onto a virtual screen and return its rows, with
/// trailing blanks trimmed. Understands the sequences the ANSI theme emits.
pub fn render_screen(output: &str) -> Vec<String> {
    render_screen_at_width(output, usize::MAX)
}

/// [`render_screen`] on a screen `width` cells wide. Text wraps the way a
/// terminal with auto-margins does: after the last column the cursor waits
/// there, and only the next glyph moves it to the following row.
pub fn render_screen_at_width(output: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows: Vec<Vec<char>> = vec![Vec::new()];
    let (mut row, mut col) = (0usize, 0usize);
    let mut chars = output.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\r' => col = 0,
            '\n' => {
                row += 1;
                col = 0;
                if rows.len() <= row {
                    rows.push(Vec::new());
                }
            }
            '\x1b' => {
                if chars.peek() != Some(&'[') {
                    continue;
                }
                chars.next();
                let mut params = String::new();
                let mut final_byte = None;
                for next in chars.by_ref() {
                    if next.is_ascii_digit() || next == ';' || next == '?' {
                        params.push(next);
                    } else {
                        final_byte = Some(next);
                        break;
                    }
                }
                let count = params.parse::<usize>().unwrap_or(1).max(1);
                if matches!(final_byte, Some('A' | 'B' | 'C' | 'D')) {
                    col = col.min(width - 1);
                }
                match final_byte {
                    Some('A') => row = row.saturating_sub(count),
                    Some('B') => {
                        row += count;
                        while rows.len() <= row {
                            rows.push(Vec::new());
                        }
                    }
                    Some('C') => col = (col + count).min(width - 1),
                    Some('D') => col = col.saturating_sub(count),
                    Some('J') => {
                        rows.truncate(row + 1);
                        rows[row].truncate(col);
                    }
                    Some('K') => rows[row].clear(),
                    _ => {}
                }
            }
            ch => {
                if col >= width {
                    row += 1;
                    col = 0;
                    if rows.len() <= row {
                        rows.push(Vec::new());
                    }
                }
                let line = &mut rows[row];
                while line.len() < col {
                    line.push(' ');
                }
                if col < line.len() {
                    line[col] = ch;
                } else {
                    line.push(ch);
                }
                col += 1;
            }
        }
    }

    let mut screen: Vec<String> = rows
        .into_iter()
        .map(|line| line.into_iter().collect::<String>().trim_end().to_string())
        .collect();
    while screen.last().is_some_and(|line| line.is_empty()) {
        screen.pop();
    }
    screen
}
