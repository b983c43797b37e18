//! Merge module — k-way chronological merge over source cursors.

pub mod engine;
pub mod error;

pub use engine::MergeEngine;
pub use error::{MergeError, MergeResult};
