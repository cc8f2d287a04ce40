//! Text helpers (ANSI skipping, width calculations, truncation).
//!
//! Painted rows are measured and cut here so a row never wraps; in-place redraw
//! counts lines and a wrapped row would throw the count off.

pub mod ansi;
pub mod utils;
pub mod width;
