//! Maps tokenized rows onto `Record`s

use super::Record;

/// Column positions in the upstream sheet
const PROGRAM_COL: usize = 0;
const CONFERENCE_COL: usize = 1;
const DATE_COL: usize = 2;

/// Converts raw rows into records, dropping rows without a program
///
/// # Arguments
/// * `table` - Rows from `tokenize`
/// * `skip_header` - Discard the first row unconditionally
///
/// # Returns
/// Records in input order. Short rows are padded with empty strings; extra
/// columns are ignored.
pub fn normalize(table: &[Vec<String>], skip_header: bool) -> Vec<Record> {
    let skip = usize::from(skip_header);

    table
        .iter()
        .skip(skip)
        .map(|row| Record {
            program: column(row, PROGRAM_COL),
            conference: column(row, CONFERENCE_COL),
            date: column(row, DATE_COL),
        })
        .filter(|record| !record.program.is_empty())
        .collect()
}

fn column(row: &[String], index: usize) -> String {
    row.get(index).cloned().unwrap_or_default()
}
