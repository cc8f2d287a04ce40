//! Runtime: the console session handle.

pub mod console;

pub use console::{Console, CursorGuard};
