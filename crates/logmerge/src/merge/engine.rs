use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use super::error::{MergeError, MergeResult};
use crate::source::{CursorStats, LogEntry, SourceCursor, SourceId};
use crate::timestamp::TimestampRecognizer;

/// K-way merge over open source cursors.
///
/// The frontier keeps insertion order, which is also the tie-break order:
/// when two sources hold entries with identical timestamps, the source added
/// first is emitted first.
pub struct MergeEngine<R> {
    frontier: Vec<SourceCursor<R>>,
    recognizer: Arc<TimestampRecognizer>,
    retired: Vec<(SourceId, CursorStats)>,
}

impl MergeEngine<BufReader<File>> {
    /// Open every path, in order, as a source of the merge.
    pub fn open<P: AsRef<Path>>(paths: &[P], recognizer: TimestampRecognizer) -> MergeResult<Self> {
        let mut engine = Self::new(recognizer);
        for path in paths {
            let path = path.as_ref();
            let cursor = SourceCursor::open(path, Arc::clone(&engine.recognizer))?;
            engine.push(cursor)?;
        }
        info!(sources = engine.frontier.len(), "opened log sources");
        Ok(engine)
    }
}

impl<R: BufRead> MergeEngine<R> {
    pub fn new(recognizer: TimestampRecognizer) -> Self {
        Self {
            frontier: Vec::new(),
            recognizer: Arc::new(recognizer),
            retired: Vec::new(),
        }
    }

    /// Build an engine over in-memory or already-open readers.
    pub fn from_readers<I, S>(sources: I, recognizer: TimestampRecognizer) -> MergeResult<Self>
    where
        I: IntoIterator<Item = (S, R)>,
        S: Into<SourceId>,
    {
        let mut engine = Self::new(recognizer);
        for (id, reader) in sources {
            engine.add_source(id.into(), reader)?;
        }
        Ok(engine)
    }

    /// Add a source at the end of the frontier. Ids must be unique.
    pub fn add_source(&mut self, id: SourceId, reader: R) -> MergeResult<()> {
        if self.contains(&id) {
            return Err(MergeError::DuplicateSource(id));
        }
        let cursor = SourceCursor::new(id, reader, Arc::clone(&self.recognizer))?;
        self.frontier.push(cursor);
        Ok(())
    }

    fn push(&mut self, cursor: SourceCursor<R>) -> MergeResult<()> {
        if self.contains(cursor.id()) {
            return Err(MergeError::DuplicateSource(cursor.id().clone()));
        }
        self.frontier.push(cursor);
        Ok(())
    }

    fn contains(&self, id: &SourceId) -> bool {
        self.frontier.iter().any(|c| c.id() == id)
    }

    pub fn recognizer(&self) -> &TimestampRecognizer {
        &self.recognizer
    }

    /// Sources still in the frontier.
    pub fn len(&self) -> usize {
        self.frontier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Ids of the sources still in the frontier, in tie-break order.
    pub fn source_ids(&self) -> impl Iterator<Item = &SourceId> {
        self.frontier.iter().map(|c| c.id())
    }

    /// Counters for every source seen so far, evicted ones first.
    pub fn stats(&self) -> Vec<(SourceId, CursorStats)> {
        self.retired
            .iter()
            .cloned()
            .chain(self.frontier.iter().map(|c| (c.id().clone(), c.stats())))
            .collect()
    }

    /// Emit the earliest pending entry across all sources.
    ///
    /// Sources seen exhausted during the scan are evicted after the minimum
    /// has been selected among the others. Returns
    /// [`MergeError::EndOfStream`] once no source remains.
    pub fn next_entry(&mut self) -> MergeResult<(SourceId, LogEntry)> {
        if self.frontier.is_empty() {
            return Err(MergeError::EndOfStream);
        }

        let mut selected: Option<(usize, NaiveDateTime)> = None;
        let mut exhausted = Vec::new();
        for (idx, cursor) in self.frontier.iter().enumerate() {
            match cursor.peek_timestamp() {
                Ok(timestamp) => {
                    // Strict `<`: the first source scanned wins ties
                    if selected.map_or(true, |(_, low)| timestamp < low) {
                        selected = Some((idx, timestamp));
                    }
                }
                Err(MergeError::EndOfStream) => exhausted.push(idx),
                Err(err) => return Err(err),
            }
        }

        for &idx in exhausted.iter().rev() {
            let mut cursor = self.frontier.remove(idx);
            cursor.close();
            debug!(source = %cursor.id(), remaining = self.frontier.len(), "source exhausted, evicted");
            self.retired.push((cursor.id().clone(), cursor.stats()));
        }

        if self.frontier.is_empty() {
            debug!("all sources exhausted");
            return Err(MergeError::EndOfStream);
        }

        let Some((idx, _)) = selected else {
            return Err(MergeError::EndOfStream);
        };
        let idx = idx - exhausted.iter().filter(|&&gone| gone < idx).count();

        let cursor = &mut self.frontier[idx];
        let entry = cursor.take_entry()?;
        Ok((cursor.id().clone(), entry))
    }

    /// Close every remaining source.
    pub fn close(&mut self) {
        for mut cursor in self.frontier.drain(..) {
            cursor.close();
            self.retired.push((cursor.id().clone(), cursor.stats()));
        }
    }
}

impl<R: BufRead> Iterator for MergeEngine<R> {
    type Item = MergeResult<(SourceId, LogEntry)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_entry() {
            Ok(item) => Some(Ok(item)),
            Err(MergeError::EndOfStream) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
