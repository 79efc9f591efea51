//! Aligned table rendering for `--pretty` output.
//!
//! Display-only: column widths come from content, long cells are truncated
//! with an ellipsis, and nothing here is meant to be parsed back. Width
//! math is Unicode-aware so CJK titles line up.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cells wider than this are truncated.
const MAX_CELL_WIDTH: usize = 50;

pub fn render_table(title: &str, headers: &[&str], rows: &[Vec<String>]) -> String {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| truncate(cell, MAX_CELL_WIDTH)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.width());
            }
        }
    }

    let mut out = String::new();
    if !title.is_empty() {
        out.push_str(title);
        out.push_str("\n\n");
    }
    push_row(&mut out, headers.iter().map(|h| h.to_string()), &widths);
    push_row(
        &mut out,
        widths.iter().map(|w| "-".repeat(*w)),
        &widths,
    );
    for row in &rows {
        push_row(&mut out, row.iter().cloned(), &widths);
    }
    out.push_str(&format!("\n{} results", rows.len()));
    out
}

/// One padded row; the last column is never right-padded, so no line
/// carries trailing spaces.
fn push_row<I: Iterator<Item = String>>(out: &mut String, cells: I, widths: &[usize]) {
    let cells: Vec<String> = cells.collect();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(cell);
        if i + 1 < cells.len() {
            let width = widths.get(i).copied().unwrap_or(0);
            for _ in cell.width()..width {
                out.push(' ');
            }
        }
    }
    out.push('\n');
}

/// Truncate to `max` display columns, appending `...` when cut.
fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let budget = max.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_to_widest_cell() {
        let table = render_table(
            "",
            &["ID", "Title"],
            &[
                vec!["1".into(), "short".into()],
                vec!["12345".into(), "x".into()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ID     Title");
        assert_eq!(lines[1], "-----  -----");
        assert_eq!(lines[2], "1      short");
        assert_eq!(lines[3], "12345  x");
    }

    #[test]
    fn long_cells_are_truncated_with_ellipsis() {
        let long = "x".repeat(80);
        let table = render_table("", &["Title"], &[vec![long]]);
        let row = table.lines().nth(2).unwrap();
        assert_eq!(row.len(), 50);
        assert!(row.ends_with("..."));
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!("你好".width(), 4);
        let table = render_table("", &["T", "N"], &[vec!["你好".into(), "1".into()]]);
        let lines: Vec<&str> = table.lines().collect();
        // "你好" occupies 4 columns, so the header pads to match.
        assert_eq!(lines[2], "你好  1");
        assert_eq!(lines[0], "T     N");
    }

    #[test]
    fn footer_reports_row_count() {
        let table = render_table("Results", &["A"], &[vec!["1".into()], vec!["2".into()]]);
        assert!(table.starts_with("Results\n\n"));
        assert!(table.ends_with("2 results"));
    }

    #[test]
    fn no_trailing_spaces_on_any_line() {
        let table = render_table(
            "T",
            &["A", "B"],
            &[vec!["x".into(), "y".into()], vec!["longer".into(), "z".into()]],
        );
        for line in table.lines() {
            assert!(!line.ends_with(' '), "trailing space on {line:?}");
        }
    }
}
