//! Scalar lexical rules shared by the encoder and decoder.
//!
//! Both sides must agree on three things for round-trips to hold: which
//! strings require quoting, what counts as a numeric literal, and how
//! escape sequences work. Keeping the rules in one place keeps them from
//! drifting apart.

use crate::error::EncodeError;
use serde_json::{Number, Value};

/// Indentation step in spaces. One level of nesting is exactly this many
/// columns; anything else is rejected by the decoder.
pub(crate) const INDENT: usize = 2;

/// Which delimiter is "active" at the position a scalar is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    /// Key-value line, list item, or bare root scalar. Colon is active.
    Line,
    /// Inline array element or tabular cell. Comma is active.
    Cell,
}

/// Strict numeric grammar: `-?(0|[1-9][0-9]*)(\.[0-9]+)?`.
///
/// Deliberately narrower than what `str::parse::<f64>` accepts: no
/// exponents, no leading zeros, no bare `.` forms. Unquoted tokens outside
/// this grammar decode as strings, so zero-padded identifiers like `007`
/// survive a round-trip intact.
pub(crate) fn is_numeric_literal(s: &str) -> bool {
    let rest = s.strip_prefix('-').unwrap_or(s);
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };
    let int_ok = int_part == "0"
        || (!int_part.is_empty()
            && !int_part.starts_with('0')
            && int_part.bytes().all(|b| b.is_ascii_digit()));
    let frac_ok = match frac_part {
        Some(f) => !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()),
        None => true,
    };
    int_ok && frac_ok
}

/// Interpret an unquoted token: keyword, number per the strict grammar,
/// or plain string.
pub(crate) fn parse_scalar(token: &str) -> Value {
    match token {
        "null" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ if is_numeric_literal(token) => {
            if !token.contains('.') {
                if let Ok(i) = token.parse::<i64>() {
                    return Value::Number(i.into());
                }
                if let Ok(u) = token.parse::<u64>() {
                    return Value::Number(u.into());
                }
            }
            match token.parse::<f64>().ok().and_then(Number::from_f64) {
                Some(n) => Value::Number(n),
                None => Value::String(token.to_string()),
            }
        }
        _ => Value::String(token.to_string()),
    }
}

/// Format a number as its shortest round-trippable decimal form.
///
/// Whole-valued floats print as integers and `-0` normalizes to `0`.
/// `f64`'s `Display` already produces the shortest representation that
/// parses back to the same value, and never uses exponent notation.
pub(crate) fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    let f = n.as_f64().unwrap_or(0.0);
    let f = if f == 0.0 { 0.0 } else { f };
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        return (f as i64).to_string();
    }
    f.to_string()
}

/// Does this string require quoting to survive a round-trip?
pub(crate) fn needs_quoting(s: &str, scope: Scope) -> bool {
    if s.is_empty() || s != s.trim() {
        return true;
    }
    if matches!(s, "null" | "true" | "false") {
        return true;
    }
    if is_numeric_literal(s) {
        return true;
    }
    // Leading hyphen collides with the list item marker.
    if s.starts_with('-') {
        return true;
    }
    if s.chars()
        .any(|c| matches!(c, '"' | '\\' | '[' | ']' | '{' | '}') || c.is_control())
    {
        return true;
    }
    match scope {
        Scope::Line => s.contains(':'),
        Scope::Cell => s.contains(','),
    }
}

/// Append `s` to `out` as a quoted, escaped string.
pub(crate) fn push_quoted(s: &str, out: &mut String) -> Result<(), EncodeError> {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => return Err(EncodeError::UnescapableControl(c)),
            c => out.push(c),
        }
    }
    out.push('"');
    Ok(())
}

/// Reverse the escape sequences produced by [`push_quoted`].
pub(crate) fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Position of the closing quote for a string opened just before `start`,
/// skipping escaped characters. Byte-indexed; quotes and backslashes are
/// ASCII so this is UTF-8 safe.
pub(crate) fn find_closing_quote(s: &str, start: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}
