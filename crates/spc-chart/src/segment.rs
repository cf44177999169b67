//! Splitting a series into periods
//!
//! A split after index `i` ends one period at `i` and starts the next at
//! `i + 1`. Each period gets its own XmR statistics; only the first honours
//! the requested baseline, later periods use all of their points.

use crate::xmr::{compute_xmr, XmrStatistics};
use serde::{Deserialize, Serialize};
use spc_core::{Point, Result};
use tracing::{debug, instrument};

/// Valid split indices for `n` points: below `n - 1`, sorted, unique
pub fn normalize_splits(splits: &[usize], n: usize) -> Vec<usize> {
    let mut valid: Vec<usize> = splits
        .iter()
        .copied()
        .filter(|&i| i < n.saturating_sub(1))
        .collect();
    valid.sort_unstable();
    valid.dedup();
    valid
}

/// Inclusive `(start, end)` index pairs of each period
///
/// # Examples
///
/// ```rust
/// use spc_chart::segment_bounds;
///
/// assert_eq!(segment_bounds(10, &[3, 6]), vec![(0, 3), (4, 6), (7, 9)]);
/// assert_eq!(segment_bounds(10, &[]), vec![(0, 9)]);
/// ```
pub fn segment_bounds(n: usize, splits: &[usize]) -> Vec<(usize, usize)> {
    if n == 0 {
        return Vec::new();
    }
    let mut bounds = Vec::new();
    let mut start = 0;
    for split in normalize_splits(splits, n) {
        bounds.push((start, split));
        start = split + 1;
    }
    bounds.push((start, n - 1));
    bounds
}

/// One period of an XmR chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start_index: usize,
    /// Inclusive
    pub end_index: usize,
    pub points: Vec<Point>,
    pub baseline_count_used: usize,
    pub statistics: XmrStatistics,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Global index of a point given its index within the period
    pub fn global_index(&self, local: usize) -> usize {
        self.start_index + local
    }
}

/// Split an ordered series into periods and compute each period's limits
///
/// Out-of-range and duplicate splits are dropped silently. An empty series
/// has no periods.
#[instrument(skip_all, fields(n = points.len(), splits = splits.len()))]
pub fn segment_points(
    points: &[Point],
    baseline_count: Option<usize>,
    splits: &[usize],
    clamp_lcl: bool,
) -> Result<Vec<Segment>> {
    segment_bounds(points.len(), splits)
        .into_iter()
        .enumerate()
        .map(|(period, (start, end))| {
            let slice = &points[start..=end];
            let baseline = if period == 0 { baseline_count } else { None };
            let statistics = compute_xmr(slice, baseline, clamp_lcl)?;
            debug!(
                period,
                start,
                end,
                mean = statistics.mean,
                sigma = statistics.sigma,
                "computed period limits"
            );
            Ok(Segment {
                start_index: start,
                end_index: end,
                points: slice.to_vec(),
                baseline_count_used: statistics.baseline_count_used,
                statistics,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| Point::indexed(i, ((i * 7) % 5) as f64 + i as f64 * 0.1, None))
            .collect()
    }

    #[test]
    fn test_normalize_splits() {
        assert_eq!(normalize_splits(&[5, 2, 5, 9, 8, 0], 10), vec![0, 2, 5, 8]);
        assert!(normalize_splits(&[0], 1).is_empty());
        assert!(normalize_splits(&[3], 0).is_empty());
    }

    #[test]
    fn test_huge_split_index_is_dropped() {
        assert_eq!(normalize_splits(&[usize::MAX, 2], 10), vec![2]);
        assert_eq!(segment_bounds(4, &[usize::MAX]), vec![(0, 3)]);
    }

    #[test]
    fn test_bounds_cover_series() {
        assert_eq!(segment_bounds(5, &[0]), vec![(0, 0), (1, 4)]);
        assert_eq!(segment_bounds(5, &[4, 7]), vec![(0, 4)]);
        assert!(segment_bounds(0, &[1]).is_empty());
    }

    #[test]
    fn test_only_first_period_uses_baseline() {
        let pts = points(20);
        let segments = segment_points(&pts, Some(4), &[9], false).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].baseline_count_used, 4);
        assert_eq!(segments[1].baseline_count_used, 10);
        assert_eq!(segments[1].global_index(0), 10);
        assert_eq!(segments[0].len() + segments[1].len(), 20);
    }

    #[test]
    fn test_no_splits_matches_whole_series() {
        let pts = points(15);
        let segments = segment_points(&pts, Some(6), &[], true).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].statistics, compute_xmr(&pts, Some(6), true).unwrap());
    }

    #[test]
    fn test_empty_series_has_no_periods() {
        assert!(segment_points(&[], None, &[2], false).unwrap().is_empty());
    }
}
