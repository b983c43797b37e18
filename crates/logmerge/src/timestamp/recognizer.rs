use chrono::NaiveDateTime;

use super::custom::{CustomGrammar, GrammarError};
use super::grammar::{match_builtin, GrammarKind, BUILTIN_GRAMMARS};

/// A timestamp found at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recognized {
    pub timestamp: NaiveDateTime,
    /// Bytes of the line consumed by the grammar
    pub len: usize,
    pub grammar: GrammarKind,
}

/// Decides whether a line opens a new entry.
///
/// Grammars are tried in a fixed order: the configured custom grammar (if
/// any), then comma-millis, slash-micros and epoch seconds. The first match
/// wins; no match means the line is a continuation of the previous entry.
///
/// Holds no state besides the custom grammar, so one recognizer can be
/// shared by every source of a merge.
#[derive(Debug, Default)]
pub struct TimestampRecognizer {
    custom: Option<CustomGrammar>,
}

impl TimestampRecognizer {
    /// Built-in grammars only.
    pub fn new() -> Self {
        Self { custom: None }
    }

    pub fn with_custom(custom: CustomGrammar) -> Self {
        Self {
            custom: Some(custom),
        }
    }

    /// Build from an optional `(regex, format)` pair.
    pub fn from_pattern(pattern: Option<(&str, &str)>) -> Result<Self, GrammarError> {
        match pattern {
            Some((regex, format)) => Ok(Self::with_custom(CustomGrammar::new(regex, format)?)),
            None => Ok(Self::new()),
        }
    }

    pub fn custom(&self) -> Option<&CustomGrammar> {
        self.custom.as_ref()
    }

    pub fn recognize(&self, line: &[u8]) -> Option<Recognized> {
        if let Some(custom) = &self.custom {
            if let Some((timestamp, len)) = custom.recognize(line) {
                return Some(Recognized {
                    timestamp,
                    len,
                    grammar: GrammarKind::Custom,
                });
            }
        }

        BUILTIN_GRAMMARS.iter().find_map(|&grammar| {
            match_builtin(grammar, line).map(|(timestamp, len)| Recognized {
                timestamp,
                len,
                grammar,
            })
        })
    }

    /// Shorthand for [`recognize`](Self::recognize) when only the instant matters.
    #[inline]
    pub fn timestamp(&self, line: &[u8]) -> Option<NaiveDateTime> {
        self.recognize(line).map(|r| r.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::Presets;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32, micro: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_micro_opt(h, m, s, micro)
            .unwrap()
    }

    // ── Built-in priority ───────────────────────────────────────

    #[test]
    fn test_builtin_grammars_dispatch() {
        let r = TimestampRecognizer::new();

        let hit = r.recognize(b"2024-01-01 10:00:00,500 start\n").unwrap();
        assert_eq!(hit.grammar, GrammarKind::CommaMillis);
        assert_eq!(hit.timestamp, at(10, 0, 0, 500_000));

        let hit = r.recognize(b"2024/01/01 10:00:00.000001 x\n").unwrap();
        assert_eq!(hit.grammar, GrammarKind::SlashMicros);
        assert_eq!(hit.timestamp, at(10, 0, 0, 1));

        let hit = r.recognize(b"1700000000 boot\n").unwrap();
        assert_eq!(hit.grammar, GrammarKind::Epoch);
    }

    #[test]
    fn test_no_timestamp_is_continuation() {
        let r = TimestampRecognizer::new();
        assert!(r.recognize(b"not a timestamp\n").is_none());
        assert!(r.recognize(b"  trace line\n").is_none());
        assert!(r.recognize(b"\tat com.example.Main.run(Main.java:42)\n").is_none());
        assert!(r.recognize(b"\n").is_none());
        assert!(r.recognize(b"").is_none());
    }

    #[test]
    fn test_mid_line_timestamp_never_matches() {
        let r = TimestampRecognizer::new();
        assert!(r.recognize(b"ERROR 2024-01-01 10:00:00,500 boom\n").is_none());
        assert!(r.recognize(b"pid 1700000000 x\n").is_none());
    }

    #[test]
    fn test_comma_grammar_outranks_epoch() {
        let r = TimestampRecognizer::new();
        let hit = r.recognize(b"2024-01-01 10:00:00,500 1700000000 \n").unwrap();
        assert_eq!(hit.grammar, GrammarKind::CommaMillis);
        assert_eq!(hit.timestamp, at(10, 0, 0, 500_000));
    }

    #[test]
    fn test_impossible_date_falls_through() {
        let r = TimestampRecognizer::new();
        assert!(r.recognize(b"2024-02-30 10:00:00,500 x\n").is_none());
    }

    // ── Custom grammar ──────────────────────────────────────────

    #[test]
    fn test_custom_grammar_tried_first() {
        let custom = CustomGrammar::new(r"^(\d{4}) ", "%Y").unwrap();
        let r = TimestampRecognizer::with_custom(custom);

        // "%Y" alone cannot build a datetime, so the custom grammar fails and
        // the epoch grammar takes over
        let hit = r.recognize(b"2024 x\n").unwrap();
        assert_eq!(hit.grammar, GrammarKind::Epoch);
    }

    #[test]
    fn test_custom_grammar_wins_over_builtin() {
        let custom = CustomGrammar::new(
            r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}),\d{3} ",
            "%Y-%m-%d %H:%M:%S",
        )
        .unwrap();
        let r = TimestampRecognizer::with_custom(custom);

        let hit = r.recognize(b"2024-01-01 10:00:00,500 start\n").unwrap();
        assert_eq!(hit.grammar, GrammarKind::Custom);
        // Custom format drops the milliseconds
        assert_eq!(hit.timestamp, at(10, 0, 0, 0));
    }

    #[test]
    fn test_custom_grammar_falls_back_to_builtins() {
        let r = TimestampRecognizer::from_pattern(Some((Presets::JAMF_PATTERN, Presets::JAMF_FORMAT))).unwrap();

        let hit = r.recognize(b" 2024-01-01T10:00:00,250 msg\n").unwrap();
        assert_eq!(hit.grammar, GrammarKind::Custom);
        assert_eq!(hit.len, 24);

        let hit = r.recognize(b"1700000000 boot\n").unwrap();
        assert_eq!(hit.grammar, GrammarKind::Epoch);
    }

    #[test]
    fn test_from_pattern_rejects_bad_regex() {
        assert!(TimestampRecognizer::from_pattern(Some(("(", "%Y"))).is_err());
        assert!(TimestampRecognizer::from_pattern(None).unwrap().custom().is_none());
    }
}
