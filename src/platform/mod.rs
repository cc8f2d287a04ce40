//! Platform-specific terminal integrations.

pub mod process_terminal;

#[cfg(unix)]
pub use process_terminal::{install_signal_flag, SignalFlagGuard};
pub use process_terminal::ProcessTerminal;
