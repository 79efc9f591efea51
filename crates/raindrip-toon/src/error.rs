//! Error types for TOON encoding and decoding.

use thiserror::Error;

/// Encoding failure.
///
/// Quoting and escaping handle nearly every string; the only inputs that
/// cannot be represented unambiguously are strings containing control
/// characters with no escape sequence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The string contains a control character that has no escape sequence
    /// (anything below U+0020 other than `\n`, `\r`, `\t`).
    #[error("string contains unescapable control character {0:?}")]
    UnescapableControl(char),
}

/// Decoding failure, with the 1-based line number where it was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parse error at line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}
