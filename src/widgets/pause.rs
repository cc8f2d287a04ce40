use crate::core::key::KeyEvent;
use crate::error::InteractionError;
use crate::runtime::Console;

pub const PAUSE_PROMPT: &str = "Press Enter to continue...";

/// Block until Enter (or Escape). Other keys are swallowed.
pub fn wait_for_enter(console: &mut Console) -> Result<(), InteractionError> {
    console.blank_line();
    console.line(PAUSE_PROMPT);
    loop {
        if matches!(console.read_key()?, KeyEvent::Enter | KeyEvent::Escape) {
            return Ok(());
        }
    }
}
