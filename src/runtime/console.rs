//! Console: the one handle interactive code talks to.
//!
//! Owns the terminal, the key decoder, and the surface. Menu handlers and the
//! form engine receive `&mut Console`; nothing else writes to the terminal.

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use crate::config::EnvConfig;
use crate::core::key::{KeyDecoder, KeyEvent};
use crate::core::terminal::Terminal;
use crate::core::theme::{Role, Theme};
use crate::error::InteractionError;
use crate::platform::ProcessTerminal;
use crate::render::Surface;

pub struct Console {
    terminal: Box<dyn Terminal>,
    decoder: KeyDecoder,
    surface: Surface,
    pause_after_action: bool,
}

impl Console {
    pub fn new(terminal: impl Terminal + 'static, theme: Theme) -> Self {
        Self {
            terminal: Box::new(terminal),
            decoder: KeyDecoder::default(),
            surface: Surface::new(theme),
            pause_after_action: true,
        }
    }

    /// Process terminal configured from the environment. `theme` is used
    /// unless ANSI output is disabled, in which case the plain provider is.
    pub fn from_config(config: &EnvConfig, theme: Theme) -> std::io::Result<Self> {
        let terminal = ProcessTerminal::from_config(config)?;
        let theme = if config.no_ansi { Theme::plain() } else { theme };
        Ok(Self::new(terminal, theme)
            .with_esc_timeout(config.esc_timeout)
            .with_pause_after_action(config.pause_after_action))
    }

    pub fn with_esc_timeout(mut self, timeout: Duration) -> Self {
        self.decoder = KeyDecoder::new(timeout);
        self
    }

    pub fn with_pause_after_action(mut self, enabled: bool) -> Self {
        self.pause_after_action = enabled;
        self
    }

    pub fn pause_after_action(&self) -> bool {
        self.pause_after_action
    }

    pub fn theme(&self) -> &Theme {
        self.surface.theme()
    }

    pub fn colorize(&self, text: &str, role: Role) -> String {
        self.surface.colorize(text, role)
    }

    /// Surface sized to the terminal's current width.
    pub fn surface(&mut self) -> &mut Surface {
        self.surface.set_width(usize::from(self.terminal.columns()));
        &mut self.surface
    }

    /// Queue one row.
    pub fn line(&mut self, text: impl AsRef<str>) {
        self.surface().line(text.as_ref());
    }

    pub fn blank_line(&mut self) {
        self.surface.blank_line();
    }

    pub fn flush(&mut self) -> Result<(), InteractionError> {
        self.surface
            .flush(&mut self.terminal)
            .map_err(|err| InteractionError::io("writing to the terminal", err))
    }

    /// Flush pending output, then block for one key.
    pub fn read_key(&mut self) -> Result<KeyEvent, InteractionError> {
        self.flush()?;
        self.decoder.read_key(&mut self.terminal)
    }

    /// Hide the cursor until the returned guard drops.
    pub fn hidden_cursor(&mut self) -> Result<CursorGuard<'_>, InteractionError> {
        let restore = !self.surface.cursor_hidden();
        self.surface.hide_cursor();
        self.flush()?;
        Ok(CursorGuard {
            console: self,
            restore,
        })
    }
}

/// Restores cursor visibility on every exit path. Nested guards only undo what
/// they changed, so release order mirrors acquisition order.
pub struct CursorGuard<'a> {
    console: &'a mut Console,
    restore: bool,
}

impl Deref for CursorGuard<'_> {
    type Target = Console;

    fn deref(&self) -> &Console {
        self.console
    }
}

impl DerefMut for CursorGuard<'_> {
    fn deref_mut(&mut self) -> &mut Console {
        self.console
    }
}

impl Drop for CursorGuard<'_> {
    fn drop(&mut self) {
        if self.restore {
            self.console.surface.show_cursor();
            if let Err(err) = self.console.flush() {
                tracing::warn!(error = %err, "failed to restore cursor visibility");
            }
        }
    }
}
