//! Two-way confirmation widget.
//!
//! Used by the form pre-fill prompt and by any yes/no action. Occupies exactly
//! [`CONFIRM_ROWS`] rows, which it leaves on screen for the caller to collapse.

use crate::core::key::{Direction, KeyEvent};
use crate::core::theme::{Role, Theme};
use crate::error::{Cancelled, InteractionError};
use crate::runtime::Console;

/// Rows printed by [`confirm_two_way`]: the question and the option row.
pub const CONFIRM_ROWS: usize = 2;

/// Which slot is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    #[default]
    Left,
    Right,
}

pub fn options_row(theme: &Theme, left: &str, right: &str, slot: Slot) -> String {
    let render = |label: &str, active: bool| {
        if active {
            theme.colorize(&format!("➤ {label}"), Role::Primary)
        } else {
            format!("  {label}")
        }
    };
    format!(
        "  {} / {}",
        render(left, slot == Slot::Left),
        render(right, slot == Slot::Right)
    )
}

/// Ask `question` with two fixed answers. Left/Right move the highlight, Enter
/// commits (`true` for the left answer), Escape cancels.
pub fn confirm_two_way(
    console: &mut Console,
    question: &str,
    left: &str,
    right: &str,
) -> Result<bool, InteractionError> {
    let mut console = console.hidden_cursor()?;
    let mut slot = Slot::Left;

    console.line(format!("  {question}"));
    let row = options_row(console.theme(), left, right, slot);
    console.line(row);

    loop {
        let next = match console.read_key()? {
            KeyEvent::Nav(Direction::Left) => Slot::Left,
            KeyEvent::Nav(Direction::Right) => Slot::Right,
            KeyEvent::Enter => return Ok(slot == Slot::Left),
            KeyEvent::Escape => return Err(Cancelled::ByUser.into()),
            _ => continue,
        };
        if next == slot {
            continue;
        }
        slot = next;
        let row = options_row(console.theme(), left, right, slot);
        let surface = console.surface();
        surface.rewind(1);
        surface.line(&row);
    }
}
