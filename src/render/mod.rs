//! Rendering: the terminal surface.

pub mod surface;

pub use surface::Surface;
