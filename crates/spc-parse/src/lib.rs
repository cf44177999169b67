//! Parsing for control-chart input
//!
//! - [`value`]: cell parsing for dates and numbers (percentages included)
//! - [`columns`]: scoring columns and choosing default date/value columns
//! - [`table`]: the tabular-parser boundary, header detection, table loading
//! - [`points`]: turning table rows into ordered chart points
//!
//! # Example
//!
//! ```rust
//! use spc_core::AxisType;
//! use spc_parse::{extract_points, infer_columns, load_csv};
//!
//! let text = "Month,Rate\n2024-01-01,55.1%\n2024-02-01,56.0%\n2024-03-01,54.2%\n";
//! let loaded = load_csv(text).unwrap();
//! let guess = infer_columns(&loaded.table);
//!
//! let points = extract_points(
//!     &loaded.table,
//!     guess.date_column.as_deref(),
//!     guess.value_column.as_deref().unwrap(),
//!     AxisType::Date,
//! )
//! .unwrap();
//! assert_eq!(points.len(), 3);
//! assert_eq!(points[0].y, 55.1);
//! ```

pub mod columns;
pub mod points;
pub mod table;
pub mod value;

pub use columns::{infer_columns, score_columns, Advisory, ColumnGuess, ColumnScore};
pub use points::{count_valid_numeric, extract_points};
pub use table::{
    detect_delimiter, detect_header, load_csv, load_table, row_data_likeness, CsvTabularParser,
    LoadedTable, TabularParser,
};
pub use value::{looks_like_data, parse_date, parse_date_str, parse_numeric, parse_numeric_str};
