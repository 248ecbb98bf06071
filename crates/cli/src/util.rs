use std::io::Write;

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::CliError;

/// Display width of a string, accounting for accents, CJK double-width, etc.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `width` display columns, adding ".." if truncated.
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if width < 3 {
        for ch in s.chars() {
            let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
            if cw <= width {
                return ch.to_string();
            }
        }
        return String::new();
    }

    if display_width(s) <= width {
        return s.to_string();
    }

    let budget = width - 2;
    let mut used = 0;
    let mut end_byte = 0;
    for (i, ch) in s.char_indices() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            end_byte = i;
            break;
        }
        used += cw;
        end_byte = i + ch.len_utf8();
    }

    format!("{}..", &s[..end_byte])
}

/// Pad or truncate a string to exactly `width` display columns.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let sw = display_width(s);
    if sw > width {
        truncate_display(s, width)
    } else {
        format!("{}{}", s, " ".repeat(width - sw))
    }
}

/// Fixed-precision number, with "-0.00" normalized to "0.00".
pub(crate) fn fmt_num(value: f64, precision: usize) -> String {
    let s = format!("{:.*}", precision, value);
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        s[1..].to_string()
    } else {
        s
    }
}

/// Signed number for differences ("+1.50", "-0.25", "0.00").
pub(crate) fn fmt_signed(value: f64, precision: usize) -> String {
    let s = fmt_num(value, precision);
    if value > 0.0 && !s.chars().all(|c| c == '0' || c == '.') {
        format!("+{s}")
    } else {
        s
    }
}

/// Write one pretty JSON document to stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| CliError::write(e.to_string()))?;
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", text).map_err(|e| CliError::write(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_width_ascii_and_accents() {
        assert_eq!(display_width("hello"), 5);
        assert_eq!(display_width("Lefèvre"), 7);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn truncate_cuts() {
        assert_eq!(truncate_display("abcdef", 5), "abc..");
        assert_eq!(truncate_display("abc", 3), "abc");
        assert_eq!(truncate_display("abc", 2), "a");
    }

    #[test]
    fn pad_right_short_and_long() {
        assert_eq!(pad_right("Inès", 6), "Inès  ");
        assert_eq!(pad_right("abcdef", 5), "abc..");
    }

    #[test]
    fn numbers() {
        assert_eq!(fmt_num(15.0, 2), "15.00");
        assert_eq!(fmt_num(-0.001, 2), "0.00");
        assert_eq!(fmt_num(-1.5, 1), "-1.5");
        assert_eq!(fmt_signed(1.5, 2), "+1.50");
        assert_eq!(fmt_signed(-0.25, 2), "-0.25");
        assert_eq!(fmt_signed(0.0, 2), "0.00");
        assert_eq!(fmt_signed(0.0001, 2), "0.00");
    }
}
