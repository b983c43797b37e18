//! Source module — per-file read-ahead cursors and the entries they produce.

pub mod cursor;
pub mod entry;

pub use cursor::{CursorStats, SourceCursor};
pub use entry::{LogEntry, SourceId};
