//! Timestamp recognition — decides which lines open a new log entry.
//!
//! - `grammar.rs`: built-in grammars (comma-millis, slash-micros, epoch)
//! - `custom.rs`: user regex + strftime format, compiled at configuration time
//! - `recognizer.rs`: priority-ordered dispatch over both

pub mod custom;
pub mod grammar;
pub mod recognizer;

pub use custom::{CustomGrammar, GrammarError, Presets};
pub use grammar::GrammarKind;
pub use recognizer::{Recognized, TimestampRecognizer};
