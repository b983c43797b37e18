//! Render module — labels, colours and line output for merged entries.

pub mod ansi;
pub mod palette;

pub use ansi::{render, write_styled};
pub use palette::{Palette, SourceStyle};
