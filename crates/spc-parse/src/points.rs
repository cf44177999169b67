//! Point extraction from a loaded table

use crate::value::{parse_date, parse_numeric};
use spc_core::{AxisType, Error, Point, Result, Table, MIN_POINTS_ANY_CHART};
use tracing::debug;

/// Number of cells in a column that parse as finite numbers
pub fn count_valid_numeric(table: &Table, column: usize) -> usize {
    table
        .column_cells(column)
        .filter(|c| parse_numeric(c).is_some())
        .count()
}

/// Turn table rows into chart points
///
/// On a date axis, rows with an unparseable date or non-numeric value are
/// skipped and the rest are sorted by date (ties keep row order). On a
/// sequence axis only the value must parse; `x` is the row index and the
/// x-column text, when present, becomes the point label.
///
/// # Errors
///
/// - [`Error::UnknownColumn`] when a named column is missing
/// - [`Error::InvalidParameter`] for a date axis without a date column
/// - [`Error::InsufficientData`] with fewer than three usable points
pub fn extract_points(
    table: &Table,
    x_column: Option<&str>,
    value_column: &str,
    axis: AxisType,
) -> Result<Vec<Point>> {
    let x = x_column.map(|c| table.require_column(c)).transpose()?;
    let y = table.require_column(value_column)?;

    let numeric = count_valid_numeric(table, y);
    if numeric < MIN_POINTS_ANY_CHART {
        return Err(Error::insufficient(MIN_POINTS_ANY_CHART, numeric));
    }

    let points: Vec<Point> = match axis {
        AxisType::Date => {
            let x = x.ok_or_else(|| {
                Error::InvalidParameter("a date axis needs a date column".to_string())
            })?;
            let mut points: Vec<Point> = (0..table.len())
                .filter_map(|row| {
                    let date = parse_date(table.cell(row, x))?;
                    let value = parse_numeric(table.cell(row, y))?;
                    Some(Point::dated(date, value))
                })
                .collect();
            points.sort_by_key(|p| p.x);
            points
        }
        AxisType::Sequence => (0..table.len())
            .filter_map(|row| {
                let value = parse_numeric(table.cell(row, y))?;
                let label = x
                    .map(|x| table.cell(row, x).as_text().trim().to_string())
                    .filter(|s| !s.is_empty());
                Some(Point::indexed(row, value, label))
            })
            .collect(),
    };

    debug!(
        rows = table.len(),
        points = points.len(),
        %axis,
        "extracted points"
    );

    if points.len() < MIN_POINTS_ANY_CHART {
        return Err(Error::insufficient(MIN_POINTS_ANY_CHART, points.len()));
    }
    Ok(points)
}
