//! Core types and utilities for statistical process control
//!
//! This crate provides the shared foundation of the spc workspace:
//!
//! - [`types`]: points, table cells, axis/chart/direction selectors
//! - [`error`]: the unified [`Error`] type and [`Result`] alias
//! - [`utils`]: mean, median, sorting and moving ranges over `f64` slices
//!
//! Every derived structure in the workspace is recomputed from a [`Table`]
//! on each analysis; nothing here is mutated in place.

pub mod error;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
pub use types::{
    values_of, AxisType, CellValue, ChartKind, Direction, Point, Table, XValue,
    MIN_POINTS_ANY_CHART, MIN_POINTS_XMR,
};
