//! TOON decoder — parses TOON text back into a JSON value tree.
//!
//! The decoder is strict where strictness protects data:
//!
//! - Tabular and expanded arrays validate the element count against the
//!   declared `[N]`, and every tabular row must carry exactly one cell per
//!   declared key.
//! - Indentation is spaces-only; children must sit exactly one indent
//!   level (two columns) deeper than their parent. Anything else is
//!   rejected as ambiguous rather than guessed at.
//! - Unquoted tokens become numbers only when they match the strict
//!   numeric grammar, so zero-padded identifiers like `007` decode as
//!   strings, not as `7`.
//!
//! Every [`ParseError`] carries the 1-based line number where the problem
//! was detected.

use crate::error::ParseError;
use crate::lexeme::{self, INDENT};
use serde_json::{Map, Value};

/// Decode TOON text into a JSON value.
///
/// ```
/// use raindrip_toon::decode;
/// use serde_json::json;
///
/// let value = decode("id: 1\ntags[2]: rust,cli").unwrap();
/// assert_eq!(value, json!({"id": 1, "tags": ["rust", "cli"]}));
/// ```
pub fn decode(input: &str) -> Result<Value, ParseError> {
    let lines = lex(input)?;
    let mut parser = Parser { lines, pos: 0 };
    let value = parser.document()?;
    if let Some(line) = parser.peek() {
        return Err(ParseError::new(
            line.number,
            "unexpected content after document",
        ));
    }
    Ok(value)
}

/// One non-blank input line: 1-based number, indent in columns, and the
/// content with surrounding whitespace stripped.
#[derive(Clone, Copy)]
struct Line<'a> {
    number: usize,
    indent: usize,
    content: &'a str,
}

fn lex(input: &str) -> Result<Vec<Line<'_>>, ParseError> {
    let mut lines = Vec::new();
    for (i, raw) in input.lines().enumerate() {
        let number = i + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let rest = raw.trim_start_matches(' ');
        if rest.starts_with('\t') {
            return Err(ParseError::new(number, "tab character in indentation"));
        }
        let indent = raw.len() - rest.len();
        if indent % INDENT != 0 {
            return Err(ParseError::new(
                number,
                format!("indent of {indent} spaces is not a multiple of {INDENT}"),
            ));
        }
        lines.push(Line {
            number,
            indent,
            content: rest.trim_end(),
        });
    }
    Ok(lines)
}

/// Parsed form of an array declaration like `[3]{id,name}:`, `[2]: a,b`,
/// or `[4]:`. `line` is where the declaration appeared, for count
/// mismatch reporting.
struct ArrayHeader {
    len: usize,
    keys: Option<Vec<String>>,
    inline: Option<String>,
    line: usize,
}

impl ArrayHeader {
    /// Parse a declaration; `text` must be consumed entirely.
    fn parse(text: &str, line: usize) -> Result<Self, ParseError> {
        let body = text
            .strip_prefix('[')
            .ok_or_else(|| ParseError::new(line, "expected array declaration"))?;
        let close = body
            .find(']')
            .ok_or_else(|| ParseError::new(line, "unterminated array length"))?;
        let len = body[..close]
            .parse::<usize>()
            .map_err(|_| ParseError::new(line, format!("invalid array length {:?}", &body[..close])))?;
        let rest = &body[close + 1..];

        if let Some(after_brace) = rest.strip_prefix('{') {
            let brace_close = find_header_close(after_brace)
                .ok_or_else(|| ParseError::new(line, "unterminated key list"))?;
            let keys = parse_header_keys(&after_brace[..brace_close], line)?;
            if &after_brace[brace_close + 1..] != ":" {
                return Err(ParseError::new(line, "expected \":\" after key list"));
            }
            return Ok(Self {
                len,
                keys: Some(keys),
                inline: None,
                line,
            });
        }
        if let Some(values) = rest.strip_prefix(": ") {
            return Ok(Self {
                len,
                keys: None,
                inline: Some(values.to_string()),
                line,
            });
        }
        if rest == ":" {
            return Ok(Self {
                len,
                keys: None,
                inline: None,
                line,
            });
        }
        Err(ParseError::new(line, "malformed array declaration"))
    }
}

struct Parser<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    fn document(&mut self) -> Result<Value, ParseError> {
        let Some(first) = self.peek() else {
            return Ok(Value::Object(Map::new()));
        };
        if first.indent != 0 {
            return Err(ParseError::new(first.number, "unexpected indent at start"));
        }
        // Root array: the declaration has no key in front of it.
        if first.content.starts_with('[') {
            self.pos += 1;
            let header = ArrayHeader::parse(first.content, first.number)?;
            return self.array(header, 0);
        }
        // Root scalar: a single line with no key structure.
        if self.lines.len() == 1 && !is_field_line(first.content) {
            self.pos += 1;
            return scalar_token(first.content, first.number);
        }
        let mut map = Map::new();
        self.fields_into(&mut map, 0)?;
        Ok(Value::Object(map))
    }

    /// Parse fields at exactly `col` into `map`, stopping at the first
    /// shallower line. A deeper line here means the input skipped an
    /// indent level.
    fn fields_into(
        &mut self,
        map: &mut Map<String, Value>,
        col: usize,
    ) -> Result<(), ParseError> {
        while let Some(line) = self.peek() {
            if line.indent < col {
                break;
            }
            if line.indent > col {
                return Err(ParseError::new(
                    line.number,
                    format!("expected indent of {col} spaces, found {}", line.indent),
                ));
            }
            self.pos += 1;
            let (key, value) = self.field(line.content, col, line.number)?;
            if map.insert(key.clone(), value).is_some() {
                return Err(ParseError::new(line.number, format!("duplicate key {key:?}")));
            }
        }
        Ok(())
    }

    /// One field: key plus scalar, nested block, or array. `col` is the
    /// column the field content starts at (equal to the line indent except
    /// for the first field of a list item).
    fn field(
        &mut self,
        content: &str,
        col: usize,
        number: usize,
    ) -> Result<(String, Value), ParseError> {
        let (key, rest) = parse_key(content, number)?;
        if rest.starts_with('[') {
            let header = ArrayHeader::parse(rest, number)?;
            let value = self.array(header, col)?;
            return Ok((key, value));
        }
        if rest == ":" {
            // Nested object when children follow, otherwise empty.
            match self.peek() {
                Some(next) if next.indent > col => {
                    let mut nested = Map::new();
                    self.fields_into(&mut nested, col + INDENT)?;
                    Ok((key, Value::Object(nested)))
                }
                _ => Ok((key, Value::Object(Map::new()))),
            }
        } else if let Some(token) = rest.strip_prefix(": ") {
            Ok((key, scalar_token(token, number)?))
        } else {
            Err(ParseError::new(number, "expected \":\" after key"))
        }
    }

    /// Array body for a declaration on a line at column `col`.
    fn array(&mut self, header: ArrayHeader, col: usize) -> Result<Value, ParseError> {
        if let Some(inline) = &header.inline {
            let values = parse_cells(inline, header.line)?;
            if values.len() != header.len {
                return Err(ParseError::new(
                    header.line,
                    format!(
                        "array declares {} elements, found {}",
                        header.len,
                        values.len()
                    ),
                ));
            }
            return Ok(Value::Array(values));
        }
        if let Some(keys) = &header.keys {
            return self.tabular_rows(keys, &header, col);
        }
        if header.len == 0 {
            return Ok(Value::Array(Vec::new()));
        }
        self.list_items(&header, col)
    }

    fn tabular_rows(
        &mut self,
        keys: &[String],
        header: &ArrayHeader,
        col: usize,
    ) -> Result<Value, ParseError> {
        let row_col = col + INDENT;
        let mut rows = Vec::new();
        while let Some(line) = self.peek() {
            if line.indent <= col {
                break;
            }
            if line.indent != row_col {
                return Err(ParseError::new(
                    line.number,
                    format!("expected indent of {row_col} spaces, found {}", line.indent),
                ));
            }
            self.pos += 1;
            let cells = parse_cells(line.content, line.number)?;
            if cells.len() != keys.len() {
                return Err(ParseError::new(
                    line.number,
                    format!("row has {} cells, expected {}", cells.len(), keys.len()),
                ));
            }
            let mut obj = Map::new();
            for (key, value) in keys.iter().zip(cells) {
                obj.insert(key.clone(), value);
            }
            rows.push(Value::Object(obj));
        }
        if rows.len() != header.len {
            return Err(ParseError::new(
                header.line,
                format!(
                    "tabular array declares {} rows, found {}",
                    header.len,
                    rows.len()
                ),
            ));
        }
        Ok(Value::Array(rows))
    }

    fn list_items(&mut self, header: &ArrayHeader, col: usize) -> Result<Value, ParseError> {
        let item_col = col + INDENT;
        let mut items = Vec::new();
        while let Some(line) = self.peek() {
            if line.indent <= col {
                break;
            }
            if line.indent != item_col {
                return Err(ParseError::new(
                    line.number,
                    format!("expected indent of {item_col} spaces, found {}", line.indent),
                ));
            }
            if line.content == "-" {
                self.pos += 1;
                items.push(Value::Object(Map::new()));
                continue;
            }
            let Some(content) = line.content.strip_prefix("- ") else {
                return Err(ParseError::new(line.number, "expected \"- \" list item"));
            };
            self.pos += 1;
            items.push(self.list_item(content, item_col + INDENT, line.number)?);
        }
        if items.len() != header.len {
            return Err(ParseError::new(
                header.line,
                format!(
                    "list declares {} items, found {}",
                    header.len,
                    items.len()
                ),
            ));
        }
        Ok(Value::Array(items))
    }

    /// One expanded list item. `content_col` is the column the content
    /// after `- ` starts at; sibling fields of an item object appear
    /// there on subsequent lines.
    fn list_item(
        &mut self,
        content: &str,
        content_col: usize,
        number: usize,
    ) -> Result<Value, ParseError> {
        if content.starts_with('[') {
            let header = ArrayHeader::parse(content, number)?;
            return self.array(header, content_col);
        }
        if is_field_line(content) {
            let mut map = Map::new();
            let (key, value) = self.field(content, content_col, number)?;
            map.insert(key, value);
            self.fields_into(&mut map, content_col)?;
            return Ok(Value::Object(map));
        }
        scalar_token(content, number)
    }
}

/// Does this content look like `key: ...` or `key[...` (with quoted-key
/// support)? Used to classify root lines and list item content.
fn is_field_line(content: &str) -> bool {
    if content.starts_with('"') {
        if let Some(end) = lexeme::find_closing_quote(content, 1) {
            return matches!(content.as_bytes().get(end + 1), Some(b':') | Some(b'['));
        }
        return false;
    }
    match content.find([':', '[']) {
        Some(pos) if pos > 0 => !content[..pos].contains(' '),
        _ => false,
    }
}

/// Split a field line into key and remainder (starting at `:` or `[`).
fn parse_key(content: &str, number: usize) -> Result<(String, &str), ParseError> {
    if content.starts_with('"') {
        let end = lexeme::find_closing_quote(content, 1)
            .ok_or_else(|| ParseError::new(number, "unterminated quoted key"))?;
        return Ok((lexeme::unescape(&content[1..end]), &content[end + 1..]));
    }
    let stop = content
        .find([':', '['])
        .ok_or_else(|| ParseError::new(number, "expected \":\" after key"))?;
    if stop == 0 {
        return Err(ParseError::new(number, "missing key"));
    }
    let key = &content[..stop];
    if key.contains(' ') {
        return Err(ParseError::new(number, "unquoted key contains spaces"));
    }
    Ok((key.to_string(), &content[stop..]))
}

/// Interpret a complete value token: quoted string or unquoted scalar.
fn scalar_token(token: &str, number: usize) -> Result<Value, ParseError> {
    if token.starts_with('"') {
        let end = lexeme::find_closing_quote(token, 1)
            .ok_or_else(|| ParseError::new(number, "unterminated quoted string"))?;
        if end != token.len() - 1 {
            return Err(ParseError::new(
                number,
                "unexpected content after closing quote",
            ));
        }
        return Ok(Value::String(lexeme::unescape(&token[1..end])));
    }
    Ok(lexeme::parse_scalar(token))
}

/// Parse comma-separated cells (inline array values or a tabular row),
/// honoring quoted cells that may contain commas.
fn parse_cells(s: &str, number: usize) -> Result<Vec<Value>, ParseError> {
    let mut values = Vec::new();
    let mut rest = s;
    loop {
        let after = if rest.starts_with('"') {
            let end = lexeme::find_closing_quote(rest, 1)
                .ok_or_else(|| ParseError::new(number, "unterminated quoted string"))?;
            values.push(Value::String(lexeme::unescape(&rest[1..end])));
            &rest[end + 1..]
        } else {
            let end = rest.find(',').unwrap_or(rest.len());
            let token = rest[..end].trim();
            if token.is_empty() {
                return Err(ParseError::new(number, "empty cell"));
            }
            values.push(lexeme::parse_scalar(token));
            &rest[end..]
        };
        match after.strip_prefix(',') {
            Some(next) => rest = next,
            None if after.is_empty() => return Ok(values),
            None => return Err(ParseError::new(number, "expected \",\" between cells")),
        }
    }
}

/// Scan for the `}` closing a tabular key list, skipping quoted keys.
fn find_header_close(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => i = lexeme::find_closing_quote(s, i + 1)? + 1,
            b'}' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Split a tabular key list on commas, honoring quoted keys.
fn parse_header_keys(s: &str, number: usize) -> Result<Vec<String>, ParseError> {
    let mut keys = Vec::new();
    let mut rest = s;
    loop {
        let after = if rest.starts_with('"') {
            let end = lexeme::find_closing_quote(rest, 1)
                .ok_or_else(|| ParseError::new(number, "unterminated quoted key"))?;
            keys.push(lexeme::unescape(&rest[1..end]));
            &rest[end + 1..]
        } else {
            let end = rest.find(',').unwrap_or(rest.len());
            let key = &rest[..end];
            if key.is_empty() {
                return Err(ParseError::new(number, "empty key in key list"));
            }
            keys.push(key.to_string());
            &rest[end..]
        };
        match after.strip_prefix(',') {
            Some(next) => rest = next,
            None if after.is_empty() => return Ok(keys),
            None => return Err(ParseError::new(number, "expected \",\" in key list")),
        }
    }
}
