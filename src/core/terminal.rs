//! Terminal trait and scoped raw-mode acquisition.

use std::ops::{Deref, DerefMut};
use std::time::Duration;

/// Result of a single byte read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRead {
    Byte(u8),
    /// Nothing arrived before the timeout elapsed.
    Timeout,
    /// Input stream closed.
    Eof,
}

/// How the platform reports extended keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFlavor {
    /// POSIX terminals: `ESC [ A` style escape sequences.
    #[default]
    Ansi,
    /// Windows console: a `0xE0`/`0x00` sentinel followed by a scan byte.
    WindowsConsole,
}

/// Minimal byte-level terminal interface.
///
/// Everything above this trait is platform agnostic. Implementations must not
/// interpret input; that is the decoder's job.
pub trait Terminal {
    /// Switch to unbuffered, unechoed input. Idempotent.
    fn enable_raw_mode(&mut self) -> std::io::Result<()>;

    /// Restore the settings captured by the first `enable_raw_mode`.
    fn restore_mode(&mut self) -> std::io::Result<()>;

    /// Read one byte, waiting at most `timeout` (forever when `None`).
    fn read_byte(&mut self, timeout: Option<Duration>) -> std::io::Result<ByteRead>;

    /// Write output to the terminal.
    fn write(&mut self, data: &str) -> std::io::Result<()>;

    /// Terminal width in cells.
    fn columns(&self) -> u16;

    /// True once an interrupt/termination signal has been delivered.
    fn interrupted(&self) -> bool {
        false
    }

    fn input_flavor(&self) -> InputFlavor {
        InputFlavor::Ansi
    }
}

impl<T: Terminal + ?Sized> Terminal for Box<T> {
    fn enable_raw_mode(&mut self) -> std::io::Result<()> {
        (**self).enable_raw_mode()
    }

    fn restore_mode(&mut self) -> std::io::Result<()> {
        (**self).restore_mode()
    }

    fn read_byte(&mut self, timeout: Option<Duration>) -> std::io::Result<ByteRead> {
        (**self).read_byte(timeout)
    }

    fn write(&mut self, data: &str) -> std::io::Result<()> {
        (**self).write(data)
    }

    fn columns(&self) -> u16 {
        (**self).columns()
    }

    fn interrupted(&self) -> bool {
        (**self).interrupted()
    }

    fn input_flavor(&self) -> InputFlavor {
        (**self).input_flavor()
    }
}

/// RAII guard that holds raw mode and restores the previous settings on drop.
///
/// The guard dereferences to the terminal so reads happen through it.
pub struct RawModeGuard<'a, T: Terminal + ?Sized> {
    terminal: &'a mut T,
}

impl<'a, T: Terminal + ?Sized> RawModeGuard<'a, T> {
    pub fn acquire(terminal: &'a mut T) -> std::io::Result<Self> {
        terminal.enable_raw_mode()?;
        Ok(Self { terminal })
    }
}

impl<T: Terminal + ?Sized> Deref for RawModeGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.terminal
    }
}

impl<T: Terminal + ?Sized> DerefMut for RawModeGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.terminal
    }
}

impl<T: Terminal + ?Sized> Drop for RawModeGuard<'_, T> {
    fn drop(&mut self) {
        if let Err(err) = self.terminal.restore_mode() {
            tracing::warn!(error = %err, "failed to restore terminal mode");
        }
    }
}
