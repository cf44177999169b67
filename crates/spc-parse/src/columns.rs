//! Column inference
//!
//! Scores each column over the first rows of a table for how date-like and
//! how numeric its non-empty cells are, then picks default x (date) and y
//! (value) columns. When nothing scores well enough the guess falls back to
//! positional columns and says so through [`Advisory`].

use crate::value::{parse_date, parse_numeric};
use serde::{Deserialize, Serialize};
use spc_core::Table;
use std::fmt;
use tracing::debug;

/// Rows examined when scoring columns
pub const SAMPLE_ROWS: usize = 50;

/// Minimum score for a column to be chosen
pub const ACCEPT_SCORE: f64 = 0.4;

/// Date candidates must be less numeric than this
pub const DATE_MAX_NUMERIC_SCORE: f64 = 0.5;

/// Scores of a single column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnScore {
    pub column: String,
    /// Fraction of non-empty cells that parse as a date
    pub date_score: f64,
    /// Fraction of non-empty cells that parse as a number
    pub numeric_score: f64,
}

/// Default column choices
///
/// Both columns are `None` only for a table without rows or columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColumnGuess {
    /// The date column, or the first column as point labels for a sequence axis
    pub date_column: Option<String>,
    pub value_column: Option<String>,
    /// False tells the caller to fall back to a sequence axis
    pub has_date_candidate: bool,
    /// True when no column was confidently numeric and `value_column` is positional
    pub value_guessed: bool,
}

impl ColumnGuess {
    /// Non-blocking hints about columns that could not be chosen confidently
    pub fn advisories(&self) -> Vec<Advisory> {
        let mut out = Vec::new();
        if !self.has_date_candidate {
            out.push(Advisory::NoDateColumn);
        }
        if self.value_guessed || self.value_column.is_none() {
            out.push(Advisory::NoValueColumn);
        }
        out
    }
}

/// A hint produced while choosing columns; never blocks analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    /// No column looked like dates; the data is charted as a sequence
    NoDateColumn,
    /// No column looked confidently numeric; the value column was guessed
    NoValueColumn,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::NoDateColumn => write!(
                f,
                "No date column detected; treating the data as a simple sequence (charted by row order)."
            ),
            Advisory::NoValueColumn => write!(
                f,
                "Could not confidently detect a numeric value column; please check the value column before generating a chart."
            ),
        }
    }
}

fn fraction<F>(table: &Table, column: usize, rows: usize, accept: F) -> f64
where
    F: Fn(&spc_core::CellValue) -> bool,
{
    let (valid, total) = table
        .column_cells(column)
        .take(rows)
        .filter(|c| !c.is_blank())
        .fold((0usize, 0usize), |(v, t), c| (v + accept(c) as usize, t + 1));
    if total == 0 {
        0.0
    } else {
        valid as f64 / total as f64
    }
}

/// Score every column over the first [`SAMPLE_ROWS`] rows
pub fn score_columns(table: &Table) -> Vec<ColumnScore> {
    table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, name)| ColumnScore {
            column: name.clone(),
            date_score: fraction(table, i, SAMPLE_ROWS, |c| parse_date(c).is_some()),
            numeric_score: fraction(table, i, SAMPLE_ROWS, |c| parse_numeric(c).is_some()),
        })
        .collect()
}

/// First score with the strictly highest key; earlier columns win ties
fn best_by<'a, I, F>(scores: I, key: F) -> Option<&'a ColumnScore>
where
    I: Iterator<Item = &'a ColumnScore>,
    F: Fn(&ColumnScore) -> f64,
{
    scores.fold(None, |best, s| match best {
        Some(b) if key(b) >= key(s) => Some(b),
        _ => Some(s),
    })
}

/// Pick default date and value columns
///
/// The date column is the most date-like column that is not strongly
/// numeric (so a column of plain numbers is never taken for dates); the
/// value column is the most numeric column, excluding the date column when
/// another numeric column qualifies.
///
/// Without a date candidate the first column is kept as the label column.
/// Without a confident value column the most numeric other column is used,
/// or else the second column (the first when there is only one).
pub fn infer_columns(table: &Table) -> ColumnGuess {
    if table.is_empty() || table.columns().is_empty() {
        return ColumnGuess::default();
    }

    let scored = score_columns(table);

    let best_date = best_by(
        scored
            .iter()
            .filter(|s| s.date_score > 0.0 && s.numeric_score < DATE_MAX_NUMERIC_SCORE),
        |s| s.date_score,
    );
    let best_num = best_by(scored.iter(), |s| s.numeric_score);

    let date_column = best_date
        .filter(|s| s.date_score >= ACCEPT_SCORE)
        .map(|s| s.column.clone());
    let mut value_column = best_num
        .filter(|s| s.numeric_score >= ACCEPT_SCORE)
        .map(|s| s.column.clone());

    if let Some(date) = &date_column {
        if value_column.as_ref() == Some(date) {
            let next = best_by(scored.iter().filter(|s| &s.column != date), |s| {
                s.numeric_score
            });
            if let Some(next) = next.filter(|s| s.numeric_score >= ACCEPT_SCORE) {
                value_column = Some(next.column.clone());
            }
        }
    }

    let has_date_candidate = date_column.is_some();
    let date_column = date_column.or_else(|| table.columns().first().cloned());

    let value_guessed = value_column.is_none();
    if value_guessed {
        value_column = fallback_value_column(&scored, date_column.as_deref());
    }

    debug!(?date_column, ?value_column, value_guessed, "inferred default columns");

    ColumnGuess {
        date_column,
        value_column,
        has_date_candidate,
        value_guessed,
    }
}

/// Most numeric column other than `label` with any numeric cells, else positional
fn fallback_value_column(scored: &[ColumnScore], label: Option<&str>) -> Option<String> {
    best_by(
        scored
            .iter()
            .filter(|s| s.numeric_score > 0.0 && Some(s.column.as_str()) != label),
        |s| s.numeric_score,
    )
    .or_else(|| scored.get(1.min(scored.len().saturating_sub(1))))
    .map(|s| s.column.clone())
}
