//! Shift and trend rules
//!
//! Both rules scan an ordered value sequence once and report inclusive
//! index ranges.

use crate::types::{RunRange, Side, TrendDirection, TrendRange};

/// Runs of at least `run_length` consecutive points on one side of `centre`
///
/// Points exactly on the centre line end the current run and never start
/// one. Ranges are ordered and do not overlap.
///
/// # Examples
///
/// ```rust
/// use spc_rules::{find_long_run_ranges, RunRange, Side};
///
/// let values = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 9.0];
/// let ranges = find_long_run_ranges(&values, 5.0, 8);
/// assert_eq!(ranges, vec![RunRange { start: 0, end: 7, side: Side::Below, len: 8 }]);
/// ```
pub fn find_long_run_ranges(values: &[f64], centre: f64, run_length: usize) -> Vec<RunRange> {
    let mut ranges = Vec::new();
    let mut start = 0;

    while start < values.len() {
        let Some(side) = Side::of(values[start], centre) else {
            start += 1;
            continue;
        };

        let mut end = start + 1;
        while end < values.len() && Side::of(values[end], centre) == Some(side) {
            end += 1;
        }

        let len = end - start;
        if len >= run_length {
            ranges.push(RunRange {
                start,
                end: end - 1,
                side,
                len,
            });
        }
        start = end;
    }
    ranges
}

/// Strictly rising or falling sequences of at least `length` points
///
/// Equal neighbours break both directions. Once a trend reaches `length`
/// it is reported and its counter restarts at the last point, so a long
/// trend yields successive ranges that share an end point rather than one
/// ever-growing range.
pub fn find_trend_ranges(values: &[f64], length: usize) -> Vec<TrendRange> {
    let mut ranges = Vec::new();
    if values.len() < length {
        return ranges;
    }

    let mut inc_len = 1usize;
    let mut dec_len = 1usize;

    for i in 1..values.len() {
        if values[i] > values[i - 1] {
            inc_len += 1;
            dec_len = 1;
        } else if values[i] < values[i - 1] {
            dec_len += 1;
            inc_len = 1;
        } else {
            inc_len = 1;
            dec_len = 1;
        }

        if inc_len >= length {
            ranges.push(TrendRange {
                start: i + 1 - inc_len,
                end: i,
                direction: TrendDirection::Increasing,
                len: inc_len,
            });
            inc_len = 1;
        }
        if dec_len >= length {
            ranges.push(TrendRange {
                start: i + 1 - dec_len,
                end: i,
                direction: TrendDirection::Decreasing,
                len: dec_len,
            });
            dec_len = 1;
        }
    }
    ranges
}
