//! TOON encoder — serializes a JSON value tree into compact TOON text.
//!
//! TOON is an indentation-based format designed to minimize token usage
//! when structured data is consumed by language models:
//!
//! - **Key folding**: nested objects expressed via indentation, no braces
//! - **Inline arrays**: scalar arrays as `key[N]: v1,v2,v3`
//! - **Tabular arrays**: uniform object arrays as `key[N]{f1,f2}:` followed
//!   by one comma-joined row per element — keys are written once, not per
//!   element
//! - **Expanded lists**: mixed/complex arrays as `key[N]:` with `- item`
//!   lines
//! - **Context-dependent quoting**: strings quoted only when ambiguous
//!
//! Encoding is deterministic: the same value always yields byte-identical
//! output. Object key order is preserved (`serde_json` with
//! `preserve_order`).
//!
//! # Example
//! ```
//! use raindrip_toon::encode;
//! use serde_json::json;
//!
//! let value = json!({"name": "Alice", "age": 30, "tags": ["rust", "cli"]});
//! let toon = encode(&value).unwrap();
//! assert_eq!(toon, "name: Alice\nage: 30\ntags[2]: rust,cli");
//! ```

use crate::error::EncodeError;
use crate::lexeme::{self, Scope, INDENT};
use serde_json::{Map, Value};

/// Encode a JSON value into TOON text.
pub fn encode(value: &Value) -> Result<String, EncodeError> {
    let mut enc = Encoder { out: String::new() };
    match value {
        Value::Object(map) => enc.fields(map, 0)?,
        Value::Array(arr) => enc.array(arr, 0)?,
        scalar => enc.scalar(scalar, Scope::Line)?,
    }
    Ok(enc.out)
}

struct Encoder {
    out: String,
}

impl Encoder {
    /// Start a new line at the given column. The very first line of the
    /// document gets no leading newline.
    fn line(&mut self, col: usize) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        for _ in 0..col {
            self.out.push(' ');
        }
    }

    fn fields(&mut self, map: &Map<String, Value>, col: usize) -> Result<(), EncodeError> {
        for (key, value) in map {
            self.line(col);
            self.key(key)?;
            self.field_value(value, col)?;
        }
        Ok(())
    }

    /// Everything after the key on a field line: `: scalar`, a nested
    /// block, or an array declaration. `col` is the column of the field
    /// line itself.
    fn field_value(&mut self, value: &Value, col: usize) -> Result<(), EncodeError> {
        match value {
            Value::Object(map) if map.is_empty() => self.out.push(':'),
            Value::Object(map) => {
                self.out.push(':');
                self.fields(map, col + INDENT)?;
            }
            Value::Array(arr) => self.array(arr, col)?,
            scalar => {
                self.out.push_str(": ");
                self.scalar(scalar, Scope::Line)?;
            }
        }
        Ok(())
    }

    /// Array declaration and body, written at the current position.
    /// `col` is the column of the declaring line; body lines go one
    /// indent level deeper.
    fn array(&mut self, arr: &[Value], col: usize) -> Result<(), EncodeError> {
        if arr.is_empty() {
            self.out.push_str("[0]:");
            return Ok(());
        }

        // Tabular: uniform object arrays get the biggest win, keys are
        // declared once in the header.
        if let Some(keys) = tabular_keys(arr) {
            self.out.push('[');
            self.out.push_str(&arr.len().to_string());
            self.out.push_str("]{");
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    self.out.push(',');
                }
                self.key(key)?;
            }
            self.out.push_str("}:");
            for row in arr {
                self.line(col + INDENT);
                if let Value::Object(obj) = row {
                    for (i, key) in keys.iter().enumerate() {
                        if i > 0 {
                            self.out.push(',');
                        }
                        self.scalar(obj.get(*key).unwrap_or(&Value::Null), Scope::Cell)?;
                    }
                }
            }
            return Ok(());
        }

        // Inline: all-scalar arrays on a single line.
        if arr.iter().all(is_scalar) {
            self.out.push('[');
            self.out.push_str(&arr.len().to_string());
            self.out.push_str("]: ");
            for (i, value) in arr.iter().enumerate() {
                if i > 0 {
                    self.out.push(',');
                }
                self.scalar(value, Scope::Cell)?;
            }
            return Ok(());
        }

        // Expanded: everything else as "- " list items.
        self.out.push('[');
        self.out.push_str(&arr.len().to_string());
        self.out.push_str("]:");
        self.items(arr, col + INDENT)
    }

    /// Expanded list items at `item_col`. An item object's first field sits
    /// on the hyphen line, siblings at the content column, and nested
    /// children two columns deeper, so sibling fields and nested fields
    /// never share an indent.
    fn items(&mut self, arr: &[Value], item_col: usize) -> Result<(), EncodeError> {
        let content_col = item_col + INDENT;
        for item in arr {
            self.line(item_col);
            match item {
                // A bare hyphen is an empty object; the string "-" is
                // always quoted, so the forms cannot collide.
                Value::Object(map) if map.is_empty() => self.out.push('-'),
                Value::Object(map) => {
                    self.out.push_str("- ");
                    for (i, (key, value)) in map.iter().enumerate() {
                        if i > 0 {
                            self.line(content_col);
                        }
                        self.key(key)?;
                        self.field_value(value, content_col)?;
                    }
                }
                Value::Array(inner) => {
                    self.out.push_str("- ");
                    self.array(inner, content_col)?;
                }
                scalar => {
                    self.out.push_str("- ");
                    self.scalar(scalar, Scope::Line)?;
                }
            }
        }
        Ok(())
    }

    fn key(&mut self, key: &str) -> Result<(), EncodeError> {
        if is_bare_key(key) {
            self.out.push_str(key);
            Ok(())
        } else {
            lexeme::push_quoted(key, &mut self.out)
        }
    }

    fn scalar(&mut self, value: &Value, scope: Scope) -> Result<(), EncodeError> {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(true) => self.out.push_str("true"),
            Value::Bool(false) => self.out.push_str("false"),
            Value::Number(n) => self.out.push_str(&lexeme::format_number(n)),
            Value::String(s) => {
                if lexeme::needs_quoting(s, scope) {
                    lexeme::push_quoted(s, &mut self.out)?;
                } else {
                    self.out.push_str(s);
                }
            }
            // Containers never reach scalar position; callers gate on
            // is_scalar / tabular_keys.
            Value::Array(_) | Value::Object(_) => self.out.push_str("null"),
        }
        Ok(())
    }
}

/// Keys matching `[A-Za-z_][A-Za-z0-9_.]*` are written unquoted.
fn is_bare_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

fn is_scalar(value: &Value) -> bool {
    !value.is_object() && !value.is_array()
}

/// A sequence is tabular when every element is an object with the same
/// keys in the same order and every value is a scalar.
fn tabular_keys(arr: &[Value]) -> Option<Vec<&str>> {
    let first = arr.first()?.as_object()?;
    if first.is_empty() || first.values().any(|v| !is_scalar(v)) {
        return None;
    }
    let keys: Vec<&str> = first.keys().map(String::as_str).collect();
    for item in &arr[1..] {
        let obj = item.as_object()?;
        if obj.len() != keys.len() || !obj.keys().map(String::as_str).eq(keys.iter().copied()) {
            return None;
        }
        if obj.values().any(|v| !is_scalar(v)) {
            return None;
        }
    }
    Some(keys)
}
