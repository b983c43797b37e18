//! Custom timestamp grammar: a user regex with one capture group plus a
//! chrono strftime format for the captured text.
//!
//! The regex is compiled with the ripgrep engine once, at configuration
//! time, so a bad pattern or format never surfaces mid-merge.

use std::fmt;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;
use grep_matcher::{Captures, Matcher};
use grep_regex::{RegexMatcher, RegexMatcherBuilder};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("Invalid timestamp regex: {0}")]
    InvalidRegex(String),

    #[error("Timestamp regex must capture exactly one group, found {0}")]
    CaptureCount(usize),

    #[error("Invalid timestamp format {format:?}: {reason}")]
    InvalidFormat { format: String, reason: String },
}

/// Well-known custom grammars.
pub struct Presets;

impl Presets {
    /// JAMF Software Server logs: one leading space, then an ISO-like stamp
    /// with comma-delimited milliseconds.
    pub const JAMF_PATTERN: &'static str = r"^ (\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2},\d{3})";

    pub const JAMF_FORMAT: &'static str = "%Y-%m-%dT%H:%M:%S,%f";
}

pub struct CustomGrammar {
    matcher: RegexMatcher,
    pattern: String,
    /// Format after fraction normalization (see [`normalize_format`])
    format: String,
}

impl CustomGrammar {
    pub fn new(pattern: &str, format: &str) -> Result<Self, GrammarError> {
        let matcher = RegexMatcherBuilder::new()
            .multi_line(false)
            .build(pattern)
            .map_err(|e| GrammarError::InvalidRegex(e.to_string()))?;

        // capture_count includes the implicit whole-match group 0
        let groups = matcher.capture_count().saturating_sub(1);
        if groups != 1 {
            return Err(GrammarError::CaptureCount(groups));
        }

        if format.trim().is_empty() {
            return Err(GrammarError::InvalidFormat {
                format: format.to_string(),
                reason: "format must not be empty".into(),
            });
        }
        let normalized = normalize_format(format);
        if StrftimeItems::new(&normalized).any(|item| matches!(item, Item::Error)) {
            return Err(GrammarError::InvalidFormat {
                format: format.to_string(),
                reason: "unrecognized strftime specifier".into(),
            });
        }

        Ok(Self {
            matcher,
            pattern: pattern.to_string(),
            format: normalized,
        })
    }

    /// The JAMF preset grammar.
    pub fn jamf() -> Result<Self, GrammarError> {
        Self::new(Presets::JAMF_PATTERN, Presets::JAMF_FORMAT)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Match at the very start of `line` and parse the captured group.
    ///
    /// Returns the instant and the length of the whole regex match. A match
    /// that does not begin at byte 0, or captured text the format cannot
    /// parse, is no match.
    pub fn recognize(&self, line: &[u8]) -> Option<(NaiveDateTime, usize)> {
        let mut caps = self.matcher.new_captures().ok()?;
        if !self.matcher.captures(line, &mut caps).unwrap_or(false) {
            return None;
        }

        let whole = caps.get(0)?;
        if whole.start() != 0 {
            return None;
        }
        let stamp = caps.get(1)?;
        let text = std::str::from_utf8(&line[stamp.start()..stamp.end()]).ok()?;

        NaiveDateTime::parse_from_str(&expand_millis(text), &self.format)
            .ok()
            .map(|at| (at, whole.end()))
    }
}

impl fmt::Debug for CustomGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomGrammar")
            .field("pattern", &self.pattern)
            .field("format", &self.format)
            .finish()
    }
}

/// Rewrite every fraction specifier (`,%f`, `.%3f`, `%.6f`, ...) as chrono's
/// `%.f`, which reads a dot-led fraction of any precision. Captured text is
/// brought to that shape by [`expand_millis`].
fn normalize_format(format: &str) -> String {
    let bytes = format.as_bytes();
    let mut out = String::with_capacity(format.len());
    let mut skip = 0;

    for (idx, ch) in format.char_indices() {
        if skip > 0 {
            skip -= 1;
            continue;
        }
        let rest = &bytes[idx..];
        if rest.starts_with(b"%%") {
            out.push_str("%%");
            skip = 1;
        } else if let Some(len) = fraction_spec(rest) {
            out.push_str("%.f");
            skip = len - 1;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Length of the fraction specifier at the start of `spec`, if any.
fn fraction_spec(spec: &[u8]) -> Option<usize> {
    let digits = match spec {
        [b',' | b'.', b'%', digits @ ..] | [b'%', b'.', digits @ ..] => digits,
        _ => return None,
    };
    match digits {
        [b'f', ..] => Some(3),
        [b'3' | b'6' | b'9', b'f', ..] => Some(4),
        _ => None,
    }
}

/// Expand comma-delimited milliseconds (`,250`) into dot-delimited
/// microseconds (`.250000`). Only a comma followed by exactly three digits
/// is rewritten.
fn expand_millis(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + 3);
    let mut last = 0;

    for (idx, _) in text.match_indices(',') {
        let millis = &bytes[idx + 1..];
        let run = millis.iter().take_while(|b| b.is_ascii_digit()).count();
        if run == 3 {
            out.push_str(&text[last..idx]);
            out.push('.');
            out.push_str(&text[idx + 1..idx + 4]);
            out.push_str("000");
            last = idx + 4;
        }
    }
    out.push_str(&text[last..]);
    out
}

// ── Tests ───────────────────────────────────────────────────────
