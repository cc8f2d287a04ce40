//! Core interfaces and types: keys, terminal trait, output gate, theme, text.

pub mod key;
pub mod output;
pub mod terminal;
pub mod text;
pub mod theme;
