use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::source::SourceId;

#[derive(Debug, Error)]
pub enum MergeError {
    /// Normal termination: a cursor, or the whole merge, has no more entries.
    #[error("end of stream")]
    EndOfStream,

    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error reading {id}: {source}")]
    Io {
        id: SourceId,
        #[source]
        source: io::Error,
    },

    #[error("Duplicate source: {0}")]
    DuplicateSource(SourceId),
}

impl MergeError {
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, MergeError::EndOfStream)
    }
}

pub type MergeResult<T> = Result<T, MergeError>;
