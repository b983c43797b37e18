use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use chrono::NaiveDateTime;
use tracing::{debug, trace};

use super::entry::{LogEntry, SourceId};
use crate::merge::error::{MergeError, MergeResult};
use crate::timestamp::TimestampRecognizer;

enum CursorState {
    /// The first line of the next entry has been read and recognized.
    Active {
        timestamp: NaiveDateTime,
        first_line: Bytes,
    },
    /// Terminal. The stream has been released.
    Exhausted,
}

/// Per-source counters, reported in the run summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CursorStats {
    /// Untimestamped lines before the first entry (dropped)
    pub leading_dropped: usize,
    pub entries: usize,
    pub lines: usize,
}

/// Read-ahead cursor over one log source.
///
/// Always holds exactly one pending entry head (timestamp + first line) until
/// the stream ends:
/// - Lines the recognizer rejects are continuations of the pending entry
/// - The next recognized line closes the entry and becomes the new head
/// - Lines before the first recognized line belong to no entry and are dropped
///
/// The reader is owned by the cursor and dropped as soon as end-of-stream is
/// reached, on [`close`](Self::close), or when the cursor itself is dropped.
pub struct SourceCursor<R> {
    id: SourceId,
    reader: Option<R>,
    recognizer: Arc<TimestampRecognizer>,
    state: CursorState,
    line_buf: Vec<u8>,
    stats: CursorStats,
}

impl SourceCursor<BufReader<File>> {
    /// Open `path` and load its first entry head.
    pub fn open(path: &Path, recognizer: Arc<TimestampRecognizer>) -> MergeResult<Self> {
        let file = File::open(path).map_err(|source| MergeError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(SourceId::from(path), BufReader::new(file), recognizer)
    }
}

impl<R: BufRead> SourceCursor<R> {
    pub fn new(id: SourceId, reader: R, recognizer: Arc<TimestampRecognizer>) -> MergeResult<Self> {
        let mut cursor = Self {
            id,
            reader: Some(reader),
            recognizer,
            state: CursorState::Active {
                timestamp: NaiveDateTime::MAX,
                first_line: Bytes::new(),
            },
            line_buf: Vec::with_capacity(256),
            stats: CursorStats::default(),
        };

        // Everything before the first timestamped line is discarded
        let leading = cursor.advance(Vec::new())?;
        cursor.stats.leading_dropped = leading.len();
        if !leading.is_empty() {
            debug!(
                source = %cursor.id,
                dropped = leading.len(),
                "dropping untimestamped lines before first entry"
            );
        }
        if cursor.is_exhausted() {
            debug!(source = %cursor.id, "source has no timestamped lines");
        }

        Ok(cursor)
    }

    pub fn id(&self) -> &SourceId {
        &self.id
    }

    pub fn stats(&self) -> CursorStats {
        self.stats
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, CursorState::Exhausted)
    }

    /// Timestamp of the next entry, or [`MergeError::EndOfStream`].
    pub fn peek_timestamp(&self) -> MergeResult<NaiveDateTime> {
        match &self.state {
            CursorState::Active { timestamp, .. } => Ok(*timestamp),
            CursorState::Exhausted => Err(MergeError::EndOfStream),
        }
    }

    /// Consume the pending entry and read ahead to the next one.
    pub fn take_entry(&mut self) -> MergeResult<LogEntry> {
        let (timestamp, first_line) = match std::mem::replace(&mut self.state, CursorState::Exhausted) {
            CursorState::Active {
                timestamp,
                first_line,
            } => (timestamp, first_line),
            CursorState::Exhausted => return Err(MergeError::EndOfStream),
        };

        let lines = self.advance(vec![first_line])?;
        self.stats.entries += 1;
        self.stats.lines += lines.len();
        Ok(LogEntry::new(timestamp, lines))
    }

    /// Release the stream. Safe to call any number of times.
    pub fn close(&mut self) {
        self.state = CursorState::Exhausted;
        if self.reader.take().is_some() {
            debug!(source = %self.id, "source closed");
        }
    }

    /// Append continuation lines to `group` until the next timestamped line
    /// (saved as the new head, not appended) or end-of-stream.
    fn advance(&mut self, mut group: Vec<Bytes>) -> MergeResult<Vec<Bytes>> {
        loop {
            let Some(reader) = self.reader.as_mut() else {
                self.state = CursorState::Exhausted;
                return Ok(group);
            };

            self.line_buf.clear();
            let read = match reader.read_until(b'\n', &mut self.line_buf) {
                Ok(read) => read,
                Err(source) => {
                    self.close();
                    return Err(MergeError::Io {
                        id: self.id.clone(),
                        source,
                    });
                }
            };

            if read == 0 {
                trace!(source = %self.id, "end of stream");
                self.close();
                return Ok(group);
            }

            let line = Bytes::copy_from_slice(&self.line_buf);
            match self.recognizer.timestamp(&line) {
                Some(timestamp) => {
                    self.state = CursorState::Active {
                        timestamp,
                        first_line: line,
                    };
                    return Ok(group);
                }
                None => group.push(line),
            }
        }
    }
}
