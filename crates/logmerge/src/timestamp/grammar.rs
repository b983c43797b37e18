//! Built-in timestamp grammars.
//!
//! Each grammar is anchored at byte 0 of the line and scanned by hand, the
//! same way Docker timestamp prefixes are recognized: fixed separator
//! positions first, digits second, calendar validation last. A prefix that
//! has the right shape but names an impossible instant (month 13, hour 25)
//! is not a match.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarKind {
    /// User-supplied regex + strftime format
    Custom,
    /// `YYYY-MM-DD HH:MM:SS,mmm ` (cloud-init, log4j)
    CommaMillis,
    /// `YYYY/MM/DD HH:MM:SS.ffffff `
    SlashMicros,
    /// Unix seconds with optional fraction, e.g. `1700000000.25 `
    Epoch,
}

impl GrammarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrammarKind::Custom => "custom",
            GrammarKind::CommaMillis => "comma_millis",
            GrammarKind::SlashMicros => "slash_micros",
            GrammarKind::Epoch => "epoch",
        }
    }
}

/// Built-in grammars in priority order. The custom grammar, when configured,
/// is tried before all of these.
pub const BUILTIN_GRAMMARS: [GrammarKind; 3] = [
    GrammarKind::CommaMillis,
    GrammarKind::SlashMicros,
    GrammarKind::Epoch,
];

/// Run one built-in grammar against the start of `line`.
///
/// Returns the parsed instant and the number of bytes the grammar consumed
/// (including the mandatory trailing space). `GrammarKind::Custom` never
/// matches here; it lives in [`super::custom::CustomGrammar`].
pub fn match_builtin(kind: GrammarKind, line: &[u8]) -> Option<(NaiveDateTime, usize)> {
    match kind {
        GrammarKind::CommaMillis => comma_millis(line),
        GrammarKind::SlashMicros => slash_micros(line),
        GrammarKind::Epoch => epoch_seconds(line),
        GrammarKind::Custom => None,
    }
}

/// `YYYY-MM-DD HH:MM:SS,mmm `; the date/time separator may also be `T`.
pub fn comma_millis(line: &[u8]) -> Option<(NaiveDateTime, usize)> {
    // 2024-01-01 10:00:00,500 + trailing space
    const STAMP_LEN: usize = 23;
    if line.len() < STAMP_LEN + 1 {
        return None;
    }
    if line[4] != b'-' || line[7] != b'-' || (line[10] != b' ' && line[10] != b'T') {
        return None;
    }
    if line[13] != b':' || line[16] != b':' || line[19] != b',' || line[STAMP_LEN] != b' ' {
        return None;
    }

    let millis = digits(&line[20..23])?;
    let at = civil(&line[0..19], b'-')?.with_micros(millis * 1_000)?;
    Some((at, STAMP_LEN + 1))
}

/// `YYYY/MM/DD HH:MM:SS.f ` with one to six fractional digits.
pub fn slash_micros(line: &[u8]) -> Option<(NaiveDateTime, usize)> {
    // 2024/01/01 10:00:00. is 20 bytes; at least one digit and a space follow
    if line.len() < 22 {
        return None;
    }
    if line[4] != b'/' || line[7] != b'/' || line[10] != b' ' {
        return None;
    }
    if line[13] != b':' || line[16] != b':' || line[19] != b'.' {
        return None;
    }

    let frac_len = line[20..].iter().take_while(|b| b.is_ascii_digit()).count();
    if frac_len == 0 || frac_len > 6 {
        return None;
    }
    let end = 20 + frac_len;
    if line.get(end) != Some(&b' ') {
        return None;
    }

    let micros = fraction_micros(&line[20..end])?;
    let at = civil(&line[0..19], b'/')?.with_micros(micros)?;
    Some((at, end + 1))
}

/// `<digits>[.<digits>] ` read as Unix seconds in UTC.
pub fn epoch_seconds(line: &[u8]) -> Option<(NaiveDateTime, usize)> {
    let int_len = line.iter().take_while(|b| b.is_ascii_digit()).count();
    if int_len == 0 {
        return None;
    }

    let mut pos = int_len;
    let mut micros = 0;
    if line.get(pos) == Some(&b'.') {
        let frac_len = line[pos + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
        if frac_len == 0 {
            return None;
        }
        // Sub-microsecond digits are truncated
        micros = fraction_micros(&line[pos + 1..pos + 1 + frac_len.min(6)])?;
        pos += 1 + frac_len;
    }
    if line.get(pos) != Some(&b' ') {
        return None;
    }

    let secs: i64 = std::str::from_utf8(&line[..int_len]).ok()?.parse().ok()?;
    let at = DateTime::from_timestamp(secs, micros * 1_000)?.naive_utc();
    Some((at, pos + 1))
}

/// Partially validated `YYYY?MM?DD?HH:MM:SS` (19 bytes, separators already checked).
struct Civil {
    date: NaiveDate,
    hour: u32,
    minute: u32,
    second: u32,
}

impl Civil {
    fn with_micros(self, micros: u32) -> Option<NaiveDateTime> {
        self.date
            .and_hms_micro_opt(self.hour, self.minute, self.second, micros)
    }
}

fn civil(stamp: &[u8], date_sep: u8) -> Option<Civil> {
    debug_assert_eq!(stamp[4], date_sep);
    let year = digits(&stamp[0..4])?;
    let month = digits(&stamp[5..7])?;
    let day = digits(&stamp[8..10])?;
    let hour = digits(&stamp[11..13])?;
    let minute = digits(&stamp[14..16])?;
    let second = digits(&stamp[17..19])?;

    let date = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)?;
    Some(Civil { date, hour, minute, second })
}

/// Fixed-width ASCII decimal. `None` if any byte is not a digit.
fn digits(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(bytes.iter().fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0')))
}

/// Fractional-second digits (at most six) right-padded to microseconds.
fn fraction_micros(frac: &[u8]) -> Option<u32> {
    let value = digits(frac)?;
    let pad = 6u32.checked_sub(u32::try_from(frac.len()).ok()?)?;
    Some(value * 10u32.pow(pad))
}
