use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::trace;

use crate::merge::{MergeEngine, MergeError};
use crate::render::{write_styled, Palette};
use crate::source::{LogEntry, SourceId};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error("Failed to write merged output: {0}")]
    Write(#[from] io::Error),
}

/// Totals for one merge run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    pub entries: usize,
    pub lines: usize,
}

/// Writes merged entries to a destination, styled per source.
pub struct MergeSink<W: Write> {
    out: W,
    palette: Palette,
    summary: MergeSummary,
}

impl<W: Write> MergeSink<W> {
    pub fn new(out: W, palette: Palette) -> Self {
        Self {
            out,
            palette,
            summary: MergeSummary::default(),
        }
    }

    pub fn write_entry(&mut self, id: &SourceId, entry: &LogEntry) -> io::Result<()> {
        let style = self.palette.style(id);
        for line in entry.lines() {
            write_styled(&mut self.out, line, &style)?;
        }
        self.summary.entries += 1;
        self.summary.lines += entry.line_count();
        trace!(source = %id, lines = entry.line_count(), "entry written");
        Ok(())
    }

    /// Pull every entry out of `engine` and write it, then flush.
    pub fn drain<R: BufRead>(&mut self, engine: &mut MergeEngine<R>) -> Result<MergeSummary, SinkError> {
        loop {
            match engine.next_entry() {
                Ok((id, entry)) => self.write_entry(&id, &entry)?,
                Err(MergeError::EndOfStream) => break,
                Err(err) => return Err(err.into()),
            }
        }
        self.out.flush()?;
        Ok(self.summary)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
