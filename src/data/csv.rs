//! Best-effort CSV reading and writing
//!
//! `tokenize` never fails: unbalanced quotes, short rows and blank lines are
//! passed through as-is and left for the normalizer to filter.

use std::mem::take;

use super::{RawTable, Record};

/// Header line written by `to_csv`
const EXPORT_HEADER: [&str; 3] = ["Program", "Conference", "Date"];

/// Splits CSV text into rows of trimmed fields
///
/// Lines are split first, so a quoted field cannot span lines. Inside quotes
/// a comma is kept as text and `""` yields a literal quote; quote characters
/// are otherwise dropped from the field value.
///
/// # Arguments
/// * `text` - Raw CSV, header row included
///
/// # Returns
/// One row per line; no rows for empty or all-whitespace input
pub fn tokenize(text: &str) -> RawTable {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    text.lines().map(tokenize_line).collect()
}

fn tokenize_line(line: &str) -> Vec<String> {
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && matches!(chars.peek(), Some('"')) {
                    chars.next(); // escaped quote
                    field.push('"');
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                row.push(take(&mut field).trim().to_string());
            }
            _ => field.push(ch),
        }
    }

    // Unterminated quotes still flush the last field
    row.push(field.trim().to_string());
    row
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_field(out: &mut String, field: &str) {
    if needs_quotes(field) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

/// Serializes records as CSV with a `Program,Conference,Date` header
pub fn to_csv(records: &[Record]) -> String {
    let mut out = EXPORT_HEADER.join(",");
    out.push('\n');

    for record in records {
        write_field(&mut out, &record.program);
        out.push(',');
        write_field(&mut out, &record.conference);
        out.push(',');
        write_field(&mut out, &record.date);
        out.push('\n');
    }

    out
}
