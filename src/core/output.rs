//! Typed terminal output commands and a single output gate.
//!
//! Invariant: all terminal writes must flow through `OutputGate::flush(..)`.

use crate::core::key::Direction;
use crate::core::terminal::Terminal;
use crate::core::theme::Theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCmd {
    /// Text (possibly carrying color codes) written as-is.
    Text(String),
    /// Static text written as-is.
    TextStatic(&'static str),

    /// Cursor visibility.
    HideCursor,
    ShowCursor,

    /// Relative cursor movement by whole cells/lines.
    MoveCursor(Direction, usize),

    /// Erasure.
    ClearLine,
    ClearToEnd,
}

impl TerminalCmd {
    pub fn text(data: impl Into<String>) -> Self {
        Self::Text(data.into())
    }
}

#[derive(Debug, Default)]
pub struct OutputGate {
    cmds: Vec<TerminalCmd>,
}

impl OutputGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: TerminalCmd) {
        self.cmds.push(cmd);
    }

    pub fn extend<I>(&mut self, cmds: I)
    where
        I: IntoIterator<Item = TerminalCmd>,
    {
        self.cmds.extend(cmds);
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Resolve buffered commands against `theme` and write them in one call.
    ///
    /// This is the single write gate: `Terminal::write(..)` must not be called
    /// from anywhere else. Commands the theme has no sequence for vanish.
    pub fn flush<T: Terminal + ?Sized>(
        &mut self,
        term: &mut T,
        theme: &Theme,
    ) -> std::io::Result<()> {
        if self.cmds.is_empty() {
            return Ok(());
        }
        let mut out = String::new();
        for cmd in self.cmds.drain(..) {
            match cmd {
                TerminalCmd::Text(data) => out.push_str(&data),
                TerminalCmd::TextStatic(data) => out.push_str(data),
                TerminalCmd::HideCursor => out.push_str(theme.hide_cursor()),
                TerminalCmd::ShowCursor => out.push_str(theme.show_cursor()),
                TerminalCmd::MoveCursor(direction, lines) => {
                    out.push_str(&theme.cursor_move(direction, lines))
                }
                TerminalCmd::ClearLine => out.push_str(theme.clear_line()),
                TerminalCmd::ClearToEnd => out.push_str(theme.clear_to_end()),
            }
        }
        if out.is_empty() {
            return Ok(());
        }
        term.write(&out)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{OutputGate, TerminalCmd};
    use crate::core::key::Direction;
    use crate::core::terminal::{ByteRead, Terminal};
    use crate::core::theme::Theme;

    #[derive(Default)]
    struct Recorder {
        writes: Vec<String>,
    }

    impl Terminal for Recorder {
        fn enable_raw_mode(&mut self) -> std::io::Result<()> {
            Ok(())
        }

        fn restore_mode(&mut self) -> std::io::Result<()> {
            Ok(())
        }

        fn read_byte(&mut self, _timeout: Option<Duration>) -> std::io::Result<ByteRead> {
            Ok(ByteRead::Eof)
        }

        fn write(&mut self, data: &str) -> std::io::Result<()> {
            self.writes.push(data.to_string());
            Ok(())
        }

        fn columns(&self) -> u16 {
            80
        }
    }

    #[test]
    fn flush_batches_commands_into_one_write() {
        let mut gate = OutputGate::new();
        gate.extend([
            TerminalCmd::MoveCursor(Direction::Up, 3),
            TerminalCmd::ClearToEnd,
            TerminalCmd::text("row\n"),
        ]);
        let mut term = Recorder::default();
        gate.flush(&mut term, &Theme::ansi()).expect("flush");

        assert_eq!(term.writes, vec!["\x1b[3A\x1b[0Jrow\n".to_string()]);
        assert!(gate.is_empty());
    }

    #[test]
    fn plain_theme_drops_control_commands() {
        let mut gate = OutputGate::new();
        gate.extend([TerminalCmd::HideCursor, TerminalCmd::ClearLine]);
        let mut term = Recorder::default();
        gate.flush(&mut term, &Theme::plain()).expect("flush");

        assert!(term.writes.is_empty());
    }
}
