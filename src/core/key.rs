//! Raw byte to logical key decoding.
//!
//! The hard case is ESC: a bare keypress sends `0x1B` alone, while arrow keys
//! send `ESC [ A` and friends. After ESC the decoder waits a short grace window
//! for a follow-up byte. Policy:
//!
//! - nothing arrives: `Escape`
//! - `[` or `O` then `A`..`D`: `Nav`
//! - `[` or `O` then anything else: `Escape`, and both consumed bytes are dropped
//!   (accepted lossy case, e.g. `ESC [ 3 ~` yields `Escape` then `Char('~')`)
//! - any other byte: `Escape`, and that byte is redelivered as the next key

use std::time::Duration;

use crate::core::terminal::{ByteRead, InputFlavor, RawModeGuard, Terminal};
use crate::error::{Cancelled, InteractionError};

const INTERRUPT: u8 = 0x03;
const ESC: u8 = 0x1b;

/// Default ESC look-ahead window.
pub const DEFAULT_ESC_TIMEOUT: Duration = Duration::from_millis(10);

/// How often a blocking read wakes up to check the signal flag.
const SIGNAL_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Nav(Direction),
    Enter,
    Space,
    Escape,
    Digit(char),
    Char(char),
    Unknown,
}

impl KeyEvent {
    /// Backspace arrives as DEL on most terminals and BS on some.
    pub fn is_backspace(self) -> bool {
        matches!(self, KeyEvent::Char('\u{7f}') | KeyEvent::Char('\u{8}'))
    }
}

/// Stateful decoder. The only state carried between calls is the single
/// look-ahead byte read past the end of a key: the byte after a bare ESC or the
/// byte that cut a UTF-8 sequence short.
#[derive(Debug, Clone)]
pub struct KeyDecoder {
    esc_timeout: Duration,
    pending: Option<u8>,
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_ESC_TIMEOUT)
    }
}

impl KeyDecoder {
    pub fn new(esc_timeout: Duration) -> Self {
        Self {
            esc_timeout,
            pending: None,
        }
    }

    /// Block until one logical key is available.
    ///
    /// Raw mode is held only for the duration of this call and restored on every
    /// exit path. The interrupt byte yields `Cancelled::ByUser`; a delivered
    /// signal yields `Cancelled::BySignal`.
    pub fn read_key<T: Terminal + ?Sized>(
        &mut self,
        terminal: &mut T,
    ) -> Result<KeyEvent, InteractionError> {
        let mut term = RawModeGuard::acquire(terminal)
            .map_err(|err| InteractionError::io("entering raw mode", err))?;
        let first = match self.pending.take() {
            Some(byte) => byte,
            None => next_byte(&mut *term)?,
        };
        let event = match term.input_flavor() {
            InputFlavor::Ansi => self.decode_ansi(first, &mut *term)?,
            InputFlavor::WindowsConsole => self.decode_console(first, &mut *term)?,
        };
        tracing::trace!(?event, "decoded key");
        Ok(event)
    }

    fn decode_ansi<T: Terminal + ?Sized>(
        &mut self,
        byte: u8,
        term: &mut T,
    ) -> Result<KeyEvent, InteractionError> {
        if byte != ESC {
            return self.classify(byte, term);
        }
        let Some(next) = self.look_ahead(term)? else {
            return Ok(KeyEvent::Escape);
        };
        if next != b'[' && next != b'O' {
            self.pending = Some(next);
            return Ok(KeyEvent::Escape);
        }
        let event = match self.look_ahead(term)? {
            Some(b'A') => KeyEvent::Nav(Direction::Up),
            Some(b'B') => KeyEvent::Nav(Direction::Down),
            Some(b'C') => KeyEvent::Nav(Direction::Right),
            Some(b'D') => KeyEvent::Nav(Direction::Left),
            other => {
                tracing::debug!(prefix = next, dropped = ?other, "unrecognised escape sequence");
                KeyEvent::Escape
            }
        };
        Ok(event)
    }

    fn classify<T: Terminal + ?Sized>(
        &mut self,
        byte: u8,
        term: &mut T,
    ) -> Result<KeyEvent, InteractionError> {
        let event = match byte {
            INTERRUPT => return Err(Cancelled::ByUser.into()),
            b'\r' | b'\n' => KeyEvent::Enter,
            b' ' => KeyEvent::Space,
            b'0'..=b'9' => KeyEvent::Digit(byte as char),
            0x00..=0x7f => KeyEvent::Char(byte as char),
            lead => self.decode_utf8(lead, term)?,
        };
        Ok(event)
    }

    /// Assemble one character from a UTF-8 lead byte. A byte that is not a
    /// continuation ends the sequence as `Unknown` and is kept for the next read.
    fn decode_utf8<T: Terminal + ?Sized>(
        &mut self,
        lead: u8,
        term: &mut T,
    ) -> Result<KeyEvent, InteractionError> {
        let len = match lead {
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => return Ok(KeyEvent::Unknown),
        };
        let mut buf = [lead, 0, 0, 0];
        for slot in buf.iter_mut().take(len).skip(1) {
            let byte = next_byte(term)?;
            if byte & 0xc0 != 0x80 {
                self.pending = Some(byte);
                return Ok(KeyEvent::Unknown);
            }
            *slot = byte;
        }
        Ok(std::str::from_utf8(&buf[..len])
            .ok()
            .and_then(|text| text.chars().next())
            .map_or(KeyEvent::Unknown, KeyEvent::Char))
    }

    fn decode_console<T: Terminal + ?Sized>(
        &mut self,
        byte: u8,
        term: &mut T,
    ) -> Result<KeyEvent, InteractionError> {
        let event = match byte {
            0xe0 | 0x00 => match next_byte(term)? {
                b'H' => KeyEvent::Nav(Direction::Up),
                b'P' => KeyEvent::Nav(Direction::Down),
                b'K' => KeyEvent::Nav(Direction::Left),
                b'M' => KeyEvent::Nav(Direction::Right),
                _ => KeyEvent::Unknown,
            },
            ESC => KeyEvent::Escape,
            0x80..=0xff => KeyEvent::Unknown,
            other => return self.classify(other, term),
        };
        Ok(event)
    }

    fn look_ahead<T: Terminal + ?Sized>(&self, term: &mut T) -> Result<Option<u8>, InteractionError> {
        match term
            .read_byte(Some(self.esc_timeout))
            .map_err(|err| InteractionError::io("reading escape sequence", err))?
        {
            ByteRead::Byte(byte) => Ok(Some(byte)),
            ByteRead::Timeout | ByteRead::Eof => Ok(None),
        }
    }
}

fn next_byte<T: Terminal + ?Sized>(term: &mut T) -> Result<u8, InteractionError> {
    loop {
        if term.interrupted() {
            return Err(Cancelled::BySignal.into());
        }
        match term
            .read_byte(Some(SIGNAL_POLL))
            .map_err(|err| InteractionError::io("reading a key", err))?
        {
            ByteRead::Byte(byte) => return Ok(byte),
            ByteRead::Timeout => continue,
            ByteRead::Eof => {
                return Err(InteractionError::io(
                    "reading a key",
                    std::io::Error::from(std::io::ErrorKind::UnexpectedEof),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::time::Duration;

    use super::{Direction, KeyDecoder, KeyEvent};
    use crate::core::terminal::{ByteRead, InputFlavor, Terminal};
    use crate::error::{Cancelled, InteractionError};

    /// `None` entries model a gap in typing longer than any timeout.
    struct Script {
        input: VecDeque<Option<u8>>,
        flavor: InputFlavor,
        raw: bool,
        signalled: bool,
    }

    impl Script {
        fn new(input: &[Option<u8>]) -> Self {
            Self {
                input: input.iter().copied().collect(),
                flavor: InputFlavor::Ansi,
                raw: false,
                signalled: false,
            }
        }

        fn bytes(bytes: &[u8]) -> Self {
            Self::new(&bytes.iter().map(|b| Some(*b)).collect::<Vec<_>>())
        }
    }

    impl Terminal for Script {
        fn enable_raw_mode(&mut self) -> std::io::Result<()> {
            self.raw = true;
            Ok(())
        }

        fn restore_mode(&mut self) -> std::io::Result<()> {
            self.raw = false;
            Ok(())
        }

        fn read_byte(&mut self, _timeout: Option<Duration>) -> std::io::Result<ByteRead> {
            assert!(self.raw, "bytes must only be read in raw mode");
            Ok(match self.input.pop_front() {
                Some(Some(byte)) => ByteRead::Byte(byte),
                Some(None) => ByteRead::Timeout,
                None => ByteRead::Eof,
            })
        }

        fn write(&mut self, _data: &str) -> std::io::Result<()> {
            Ok(())
        }

        fn columns(&self) -> u16 {
            80
        }

        fn interrupted(&self) -> bool {
            self.signalled
        }

        fn input_flavor(&self) -> InputFlavor {
            self.flavor
        }
    }

    fn decode_all(term: &mut Script) -> Vec<KeyEvent> {
        let mut decoder = KeyDecoder::default();
        let mut out = Vec::new();
        while let Ok(key) = decoder.read_key(term) {
            out.push(key);
        }
        out
    }

    #[test]
    fn arrows_decode_to_nav() {
        let mut term = Script::bytes(b"\x1b[A\x1b[B\x1b[C\x1b[D");
        assert_eq!(
            decode_all(&mut term),
            vec![
                KeyEvent::Nav(Direction::Up),
                KeyEvent::Nav(Direction::Down),
                KeyEvent::Nav(Direction::Right),
                KeyEvent::Nav(Direction::Left),
            ]
        );
        assert!(!term.raw);
    }

    #[test]
    fn application_cursor_mode_arrows_decode_to_nav() {
        let mut term = Script::bytes(b"\x1bOA\x1bOB");
        assert_eq!(
            decode_all(&mut term),
            vec![KeyEvent::Nav(Direction::Up), KeyEvent::Nav(Direction::Down)]
        );
    }

    #[test]
    fn bare_escape_when_nothing_follows() {
        let mut term = Script::new(&[Some(0x1b), None, Some(b'x')]);
        assert_eq!(
            decode_all(&mut term),
            vec![KeyEvent::Escape, KeyEvent::Char('x')]
        );
    }

    #[test]
    fn byte_after_bare_escape_is_redelivered() {
        let mut term = Script::bytes(b"\x1bq5");
        assert_eq!(
            decode_all(&mut term),
            vec![KeyEvent::Escape, KeyEvent::Char('q'), KeyEvent::Digit('5')]
        );
    }

    #[test]
    fn double_escape_yields_two_escapes() {
        let mut term = Script::new(&[Some(0x1b), Some(0x1b), None]);
        assert_eq!(decode_all(&mut term), vec![KeyEvent::Escape, KeyEvent::Escape]);
    }

    #[test]
    fn unknown_csi_degrades_to_escape_and_drops_consumed_bytes() {
        let mut term = Script::bytes(b"\x1b[3~");
        assert_eq!(decode_all(&mut term), vec![KeyEvent::Escape, KeyEvent::Char('~')]);
    }

    #[test]
    fn plain_bytes_classify() {
        let mut term = Script::bytes(b"\r\n 7a\x7f");
        assert_eq!(
            decode_all(&mut term),
            vec![
                KeyEvent::Enter,
                KeyEvent::Enter,
                KeyEvent::Space,
                KeyEvent::Digit('7'),
                KeyEvent::Char('a'),
                KeyEvent::Char('\u{7f}'),
            ]
        );
    }

    #[test]
    fn multibyte_utf8_is_one_char() {
        let mut term = Script::bytes("é中".as_bytes());
        assert_eq!(decode_all(&mut term), vec![KeyEvent::Char('é'), KeyEvent::Char('中')]);
    }

    #[test]
    fn truncated_utf8_keeps_the_interrupting_byte() {
        let mut term = Script::bytes(&[0xc3, b'a', 0xe4, 0xb8, b'\r']);
        assert_eq!(
            decode_all(&mut term),
            vec![
                KeyEvent::Unknown,
                KeyEvent::Char('a'),
                KeyEvent::Unknown,
                KeyEvent::Enter,
            ]
        );
    }

    #[test]
    fn interrupt_byte_cancels_and_restores_mode() {
        let mut term = Script::bytes(&[0x03]);
        let mut decoder = KeyDecoder::default();
        let err = decoder.read_key(&mut term).expect_err("interrupt must cancel");
        assert!(matches!(err, InteractionError::Cancelled(Cancelled::ByUser)));
        assert!(!term.raw);
    }

    #[test]
    fn delivered_signal_cancels_blocking_read() {
        let mut term = Script::new(&[None, None]);
        term.signalled = true;
        let mut decoder = KeyDecoder::default();
        let err = decoder.read_key(&mut term).expect_err("signal must cancel");
        assert!(matches!(err, InteractionError::Cancelled(Cancelled::BySignal)));
    }

    #[test]
    fn end_of_input_is_an_io_error() {
        let mut term = Script::bytes(b"");
        let mut decoder = KeyDecoder::default();
        let err = decoder.read_key(&mut term).expect_err("eof");
        assert!(matches!(err, InteractionError::Io { .. }));
    }

    #[test]
    fn windows_extended_keys_normalise_to_nav() {
        let mut term = Script::bytes(&[0xe0, b'H', 0x00, b'P', 0xe0, b'K', 0xe0, b'M', 0x1b, b'\r']);
        term.flavor = InputFlavor::WindowsConsole;
        assert_eq!(
            decode_all(&mut term),
            vec![
                KeyEvent::Nav(Direction::Up),
                KeyEvent::Nav(Direction::Down),
                KeyEvent::Nav(Direction::Left),
                KeyEvent::Nav(Direction::Right),
                KeyEvent::Escape,
                KeyEvent::Enter,
            ]
        );
    }

    #[test]
    fn backspace_detection() {
        assert!(KeyEvent::Char('\u{7f}').is_backspace());
        assert!(KeyEvent::Char('\u{8}').is_backspace());
        assert!(!KeyEvent::Char('a').is_backspace());
    }
}
