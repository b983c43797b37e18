//! ANSI colour rendering for merged output lines.
//!
//! Each line is wrapped in a 256-colour foreground sequence:
//! `ESC[38;5;<n>m<label><text>ESC[0m<newline>`
//!
//! The reset is placed *before* the trailing newline so a colour never bleeds
//! into the next line, even when the line is cut by a pager.

use std::io::{self, Write};

use super::palette::SourceStyle;

const RESET: &[u8] = b"\x1b[0m";

/// Render one line with an optional label and colour into a new buffer.
pub fn render(line: &[u8], label: Option<&str>, color: Option<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(line.len() + label.map_or(0, str::len) + 16);
    if let Some(color) = color {
        out.extend_from_slice(format!("\x1b[38;5;{}m", color).as_bytes());
    }
    if let Some(label) = label {
        out.extend_from_slice(label.as_bytes());
    }
    if color.is_none() {
        out.extend_from_slice(line);
        return out;
    }

    match line.strip_suffix(b"\n") {
        Some(body) => {
            out.extend_from_slice(body);
            out.extend_from_slice(RESET);
            out.push(b'\n');
        }
        None => {
            out.extend_from_slice(line);
            out.extend_from_slice(RESET);
        }
    }
    out
}

/// Write one line, styled for its source.
pub fn write_styled<W: Write>(out: &mut W, line: &[u8], style: &SourceStyle) -> io::Result<()> {
    out.write_all(&render(line, style.label.as_deref(), style.color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line_unchanged() {
        assert_eq!(render(b"hello\n", None, None), b"hello\n");
    }

    #[test]
    fn test_label_prepended() {
        assert_eq!(render(b"hello\n", Some("log1 "), None), b"log1 hello\n");
    }

    #[test]
    fn test_color_reset_before_newline() {
        assert_eq!(
            render(b"hello\n", Some("log2 "), Some(2)),
            b"\x1b[38;5;2mlog2 hello\x1b[0m\n"
        );
    }

    #[test]
    fn test_color_without_trailing_newline() {
        assert_eq!(render(b"tail", None, Some(200)), b"\x1b[38;5;200mtail\x1b[0m");
    }

    #[test]
    fn test_write_styled_uses_style() {
        let style = SourceStyle {
            label: Some("api ".into()),
            color: None,
        };
        let mut out = Vec::new();
        write_styled(&mut out, b"x\n", &style).unwrap();
        assert_eq!(out, b"api x\n");
    }

    #[test]
    fn test_write_styled_matches_render() {
        let style = SourceStyle {
            label: Some("db ".into()),
            color: Some(4),
        };
        let mut out = Vec::new();
        write_styled(&mut out, b"query\n", &style).unwrap();
        assert_eq!(out, render(b"query\n", Some("db "), Some(4)));
        assert_eq!(out, b"\x1b[38;5;4mdb query\x1b[0m\n");
    }
}
