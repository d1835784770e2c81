// src/utils/csv.rs

//! Minimal quote-aware CSV reading and writing.
//!
//! The persisted tables only need comma separation, RFC-style double-quote
//! escaping and CRLF tolerance, so this stays std-only.

use std::io::{self, Write};
use std::mem::take;

/// Parse CSV text into rows of fields. Tolerates CRLF and quoted fields.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                row.push(take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(take(&mut field));
                if !row.is_empty() && !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush a trailing row without a final newline.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Render a header plus data rows as one CSV string.
pub fn to_csv_string(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut buf: Vec<u8> = Vec::new();

    let header_row: Vec<String> = header.iter().map(|s| s.to_string()).collect();
    let _ = write_row(&mut buf, &header_row);
    for row in rows {
        let _ = write_row(&mut buf, row);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_simple() {
        let rows = parse_rows("a,b,c\n1,2,3\n");
        assert_eq!(rows, vec![row(&["a", "b", "c"]), row(&["1", "2", "3"])]);
    }

    #[test]
    fn test_parse_quoted_comma_and_quote() {
        let rows = parse_rows("1,\"salt, iodized\",\"say \"\"hi\"\"\"\n");
        assert_eq!(rows, vec![row(&["1", "salt, iodized", "say \"hi\""])]);
    }

    #[test]
    fn test_parse_crlf_and_trailing_row() {
        let rows = parse_rows("a,b\r\nc,d");
        assert_eq!(rows, vec![row(&["a", "b"]), row(&["c", "d"])]);
    }

    #[test]
    fn test_write_round_trip() {
        let original = vec![row(&["7", "Peanut Butter, smooth", "Brand \"X\""])];
        let text = to_csv_string(&["id", "name", "brand"], &original);
        let mut parsed = parse_rows(&text);
        assert_eq!(parsed.remove(0), row(&["id", "name", "brand"]));
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let rows = parse_rows("a,b\n\n\nc,d\n");
        assert_eq!(rows.len(), 2);
    }
}
