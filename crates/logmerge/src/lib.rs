// Module structure for logmerge.

// Core merge path
pub mod timestamp;
pub mod source;
pub mod merge;

// Output
pub mod render;
pub mod output;

// Inputs and process lifecycle
pub mod bundle;
pub mod conf;
pub mod runtime;

pub use merge::{MergeEngine, MergeError, MergeResult};
pub use source::{LogEntry, SourceId};
pub use timestamp::TimestampRecognizer;
