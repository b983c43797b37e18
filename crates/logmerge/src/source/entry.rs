//! Entry model — source identity and grouped log entries.

use std::fmt;
use std::path::Path;

use bytes::Bytes;
use chrono::NaiveDateTime;

/// Identity of one input source, usually its path as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&Path> for SourceId {
    fn from(path: &Path) -> Self {
        Self(path.display().to_string())
    }
}

/// One timestamped line plus the continuation lines that followed it.
///
/// Lines are raw bytes with their newline (if any) still attached, so
/// writing them back out reproduces the source exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    timestamp: NaiveDateTime,
    lines: Vec<Bytes>,
}

impl LogEntry {
    /// `lines` must be non-empty; the first line carries `timestamp`.
    pub(crate) fn new(timestamp: NaiveDateTime, lines: Vec<Bytes>) -> Self {
        debug_assert!(!lines.is_empty(), "log entry without lines");
        Self { timestamp, lines }
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn lines(&self) -> &[Bytes] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}
