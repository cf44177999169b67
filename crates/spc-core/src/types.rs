//! Data model shared by every stage of chart analysis

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Position of a point on the x axis
///
/// Date and index values are never mixed within one series; the derived
/// ordering only matters within a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XValue {
    /// Calendar date (date axis)
    Date(NaiveDate),
    /// Zero-based row index in the source table (sequence axis)
    Index(usize),
}

/// A single observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: XValue,
    /// Always finite
    pub y: f64,
    /// Display label for sequence-based axes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Point {
    /// Create a point on a date axis
    pub fn dated(date: NaiveDate, y: f64) -> Self {
        Self {
            x: XValue::Date(date),
            y,
            label: None,
        }
    }

    /// Create a point on a sequence axis
    pub fn indexed(index: usize, y: f64, label: Option<String>) -> Self {
        Self {
            x: XValue::Index(index),
            y,
            label,
        }
    }

    /// The x-axis label used for charts and annotations
    ///
    /// Dates render as ISO `YYYY-MM-DD`; sequence points use their label or
    /// fall back to a 1-based `Point N`.
    pub fn axis_label(&self) -> String {
        match (&self.x, &self.label) {
            (XValue::Date(d), _) => d.format("%Y-%m-%d").to_string(),
            (XValue::Index(_), Some(label)) => label.clone(),
            (XValue::Index(i), None) => format!("Point {}", i + 1),
        }
    }
}

/// Extract the `y` values of a point slice
pub fn values_of(points: &[Point]) -> Vec<f64> {
    points.iter().map(|p| p.y).collect()
}

/// Raw content of one table cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl CellValue {
    /// True for empty cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) | CellValue::Date(_) => false,
        }
    }

    /// Textual form of the cell, untrimmed
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Empty => Cow::Borrowed(""),
            CellValue::Text(s) => Cow::Borrowed(s.as_str()),
            CellValue::Number(n) => Cow::Owned(n.to_string()),
            CellValue::Date(d) => Cow::Owned(d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Rows of cells under named columns
///
/// Every row is padded to the column count on construction so cell lookups
/// never go out of bounds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Create a table, padding or truncating rows to the column count
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Build a table from string records, treating empty strings as empty cells
    pub fn from_records<S: AsRef<str>>(columns: Vec<String>, records: &[Vec<S>]) -> Self {
        let rows = records
            .iter()
            .map(|r| r.iter().map(|c| CellValue::from(c.as_ref())).collect())
            .collect();
        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of a column, or an `UnknownColumn` error
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| Error::unknown_column(name))
    }

    /// Cell at `(row, column)`, empty when out of range
    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Iterate over the cells of one column in row order
    pub fn column_cells(&self, column: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows
            .iter()
            .map(move |r| r.get(column).unwrap_or(&EMPTY_CELL))
    }
}

/// Which side of the target counts as meeting it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Target is a floor: values at or above it meet the target
    #[default]
    Above,
    /// Target is a ceiling: values at or below it meet the target
    Below,
}

impl Direction {
    /// Whether a single value meets `target` in this direction
    pub fn meets(self, value: f64, target: f64) -> bool {
        match self {
            Direction::Above => value >= target,
            Direction::Below => value <= target,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Above => write!(f, "above"),
            Direction::Below => write!(f, "below"),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "above" => Ok(Direction::Above),
            "below" => Ok(Direction::Below),
            other => Err(Error::InvalidParameter(format!(
                "direction must be 'above' or 'below', got '{other}'"
            ))),
        }
    }
}

/// How the x column is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    /// Parse the x column as dates and sort by them
    #[default]
    Date,
    /// Keep row order; the x column only supplies labels
    Sequence,
}

impl fmt::Display for AxisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisType::Date => write!(f, "date"),
            AxisType::Sequence => write!(f, "sequence"),
        }
    }
}

impl FromStr for AxisType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(AxisType::Date),
            "sequence" => Ok(AxisType::Sequence),
            other => Err(Error::InvalidParameter(format!(
                "axis must be 'date' or 'sequence', got '{other}'"
            ))),
        }
    }
}

/// Chart family requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Median-centred run chart
    #[default]
    Run,
    /// Individuals and moving-range chart
    Xmr,
}

impl ChartKind {
    /// Minimum number of valid points the chart accepts
    pub fn minimum_points(self) -> usize {
        match self {
            ChartKind::Run => MIN_POINTS_ANY_CHART,
            ChartKind::Xmr => MIN_POINTS_XMR,
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Run => write!(f, "run"),
            ChartKind::Xmr => write!(f, "xmr"),
        }
    }
}

impl FromStr for ChartKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "run" => Ok(ChartKind::Run),
            "xmr" | "i-mr" | "imr" => Ok(ChartKind::Xmr),
            other => Err(Error::InvalidParameter(format!(
                "chart must be 'run' or 'xmr', got '{other}'"
            ))),
        }
    }
}

/// Fewest valid numeric points any chart is drawn from
pub const MIN_POINTS_ANY_CHART: usize = 3;

/// Fewest valid numeric points an XmR chart is drawn from
pub const MIN_POINTS_XMR: usize = 12;
