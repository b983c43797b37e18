//! Output module — destination naming and the merged-entry sink.

pub mod path;
pub mod sink;

pub use path::{output_path, unique_path};
pub use sink::{MergeSink, MergeSummary, SinkError};
