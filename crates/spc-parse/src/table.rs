//! Tabular loading
//!
//! Raw text is split into rows by a [`TabularParser`]; this module then
//! decides whether the first row is a header and builds a [`Table`].

use crate::value::looks_like_data;
use spc_core::{Error, Result, Table};
use std::collections::HashMap;
use tracing::debug;

/// Minimum data-likeness gain from row 1 to row 2 that marks row 1 a header
pub const HEADER_SCORE_GAP: f64 = 0.35;

/// A row repeated verbatim is a header only if it is at most this data-like
pub const REPEATED_HEADER_MAX_SCORE: f64 = 0.2;

/// Fraction of cells repeating the header that marks a duplicate header row
pub const DUPLICATE_HEADER_RATIO: f64 = 0.7;

const DELIMITERS: [u8; 4] = [b',', b'\t', b';', b'|'];

/// Splits raw text into rows of string cells
pub trait TabularParser {
    /// Parse `text` into rows, skipping blank lines
    ///
    /// Structural failures are reported as [`Error::MalformedInput`].
    fn parse_rows(&self, text: &str) -> Result<Vec<Vec<String>>>;
}

/// `csv`-backed parser with delimiter auto-detection
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvTabularParser {
    delimiter: Option<u8>,
}

impl CsvTabularParser {
    /// Parser that detects the delimiter from the first non-empty line
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser with a fixed delimiter
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter: Some(delimiter),
        }
    }
}

/// Guess the delimiter of `text` from its first non-empty line
///
/// Picks whichever of `,` tab `;` `|` occurs most often; commas win ties
/// and lines with none of them.
pub fn detect_delimiter(text: &str) -> u8 {
    let Some(line) = text.lines().find(|l| !l.trim().is_empty()) else {
        return b',';
    };
    let mut best = (b',', 0usize);
    for d in DELIMITERS {
        let count = line.bytes().filter(|&b| b == d).count();
        if count > best.1 {
            best = (d, count);
        }
    }
    best.0
}

impl TabularParser for CsvTabularParser {
    fn parse_rows(&self, text: &str) -> Result<Vec<Vec<String>>> {
        let delimiter = self.delimiter.unwrap_or_else(|| detect_delimiter(text));
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| Error::MalformedInput(e.to_string()))?;
            let row: Vec<String> = record.iter().map(str::to_string).collect();
            if row.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            rows.push(row);
        }
        debug!(rows = rows.len(), delimiter = %(delimiter as char).escape_default(), "parsed text");
        Ok(rows)
    }
}

/// Fraction of non-empty cells that read as a number or a date
pub fn row_data_likeness(row: &[String]) -> f64 {
    let (data, total) = row
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .fold((0usize, 0usize), |(d, t), c| (d + looks_like_data(c) as usize, t + 1));
    if total == 0 {
        0.0
    } else {
        data as f64 / total as f64
    }
}

/// Whether two rows hold the same text, ignoring case and padding
pub fn rows_equal_normalized(a: &[String], b: &[String]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| x.trim().to_lowercase() == y.trim().to_lowercase())
}

/// Whether `first` is a header row above `second`
pub fn detect_header(first: &[String], second: &[String]) -> bool {
    let s1 = row_data_likeness(first);
    let s2 = row_data_likeness(second);
    s2 - s1 >= HEADER_SCORE_GAP
        || (rows_equal_normalized(first, second) && s1 <= REPEATED_HEADER_MAX_SCORE)
}

/// Whether `row` repeats `header` in most of its non-empty cells
pub fn is_duplicate_header(header: &[String], row: &[String]) -> bool {
    let (same, total) = row
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.trim().is_empty())
        .fold((0usize, 0usize), |(s, t), (i, c)| {
            let repeats = header
                .get(i)
                .is_some_and(|h| h.trim().to_lowercase() == c.trim().to_lowercase());
            (s + repeats as usize, t + 1)
        });
    total > 0 && same as f64 / total as f64 >= DUPLICATE_HEADER_RATIO
}

/// Header names with blanks filled in and repeats made unique
fn column_names(header: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let base = match h.trim() {
                "" => format!("Column{}", i + 1),
                name => name.to_string(),
            };
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                base
            } else {
                format!("{base}_{}", *count - 1)
            }
        })
        .collect()
}

/// A table together with how its first row was interpreted
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTable {
    pub table: Table,
    pub had_header: bool,
}

/// Parse `text` with `parser` and build a table
///
/// # Errors
///
/// - [`Error::NoData`] when the text holds no rows or no columns
/// - [`Error::MalformedInput`] for a single row, parser failures, or rows
///   whose width differs from a detected header
pub fn load_table<P>(parser: &P, text: &str) -> Result<LoadedTable>
where
    P: TabularParser + ?Sized,
{
    let mut rows = parser.parse_rows(text)?;
    if rows.is_empty() {
        return Err(Error::empty_input("input"));
    }
    if rows.len() < 2 {
        return Err(Error::MalformedInput("Please provide at least 2 rows.".to_string()));
    }

    let had_header = detect_header(&rows[0], &rows[1]);
    let table = if had_header {
        let header = rows.remove(0);
        if rows.first().is_some_and(|r| is_duplicate_header(&header, r)) {
            debug!("dropping repeated header row");
            rows.remove(0);
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != header.len() {
                let kind = if row.len() < header.len() { "few" } else { "many" };
                return Err(Error::MalformedInput(format!(
                    "Too {kind} fields: expected {} fields but parsed {} (row {})",
                    header.len(),
                    row.len(),
                    i + 2
                )));
            }
        }
        Table::from_records(column_names(&header), &rows)
    } else {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let columns = (1..=width).map(|i| format!("Column{i}")).collect();
        Table::from_records(columns, &rows)
    };

    if table.columns().is_empty() {
        return Err(Error::empty_input("header row"));
    }
    if table.is_empty() {
        return Err(Error::empty_input("table"));
    }

    debug!(
        rows = table.len(),
        columns = table.columns().len(),
        had_header,
        "loaded table"
    );
    Ok(LoadedTable { table, had_header })
}

/// Load comma, tab, semicolon or pipe separated text
pub fn load_csv(text: &str) -> Result<LoadedTable> {
    load_table(&CsvTabularParser::new(), text)
}
