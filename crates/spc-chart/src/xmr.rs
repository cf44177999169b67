//! Individuals (X) and moving-range (MR) chart statistics
//!
//! Sigma is estimated from the average moving range of the baseline:
//! `sigma = avgMR / d2` with `d2 = 1.128` for subgroups of two. The
//! individuals limits sit at `mean ± 3 sigma`; the MR chart's upper limit is
//! `D4 * avgMR` with `D4 = 3.268`.

use serde::{Deserialize, Serialize};
use spc_core::utils::{self, moving_ranges};
use spc_core::{values_of, Error, Point, Result};
use spc_rules::is_beyond_limits;

/// d2 bias-correction constant for moving ranges of two points
pub const D2: f64 = 1.128;

/// D4 constant for the upper limit of a two-point moving-range chart
pub const D4: f64 = 3.268;

/// Width of the control limits in sigmas
pub const SIGMA_MULTIPLIER: f64 = 3.0;

/// Number of leading points used as the baseline
///
/// A requested count of two or more is honoured up to `len`; anything else
/// means the whole series.
pub fn resolve_baseline(requested: Option<usize>, len: usize) -> usize {
    match requested {
        Some(b) if b >= 2 => b.min(len),
        _ => len,
    }
}

/// A point annotated with the beyond-limits rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedPoint {
    #[serde(flatten)]
    pub point: Point,
    pub beyond_limits: bool,
}

/// Limits of the individuals chart for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XmrStatistics {
    pub mean: f64,
    /// Zero when the baseline shows no variation
    pub sigma: f64,
    pub avg_moving_range: f64,
    pub ucl: f64,
    /// Lower limit as drawn; clamped at zero when requested
    pub lcl: f64,
    /// Lower limit before any clamping
    pub raw_lcl: f64,
    pub baseline_count_used: usize,
    pub points: Vec<FlaggedPoint>,
    /// Moving ranges over every point, not only the baseline
    pub moving_ranges: Vec<f64>,
}

impl XmrStatistics {
    /// Values of the period in order
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.point.y).collect()
    }

    /// Indices of points outside the limits
    pub fn beyond_limit_indices(&self) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.beyond_limits.then_some(i))
            .collect()
    }

    /// Limits of the matching moving-range chart
    pub fn mr_limits(&self) -> MrLimits {
        MrLimits::from_avg_moving_range(self.avg_moving_range)
    }
}

/// Centre line and limits of a moving-range chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MrLimits {
    pub centre: f64,
    pub ucl: f64,
    pub lcl: f64,
}

impl MrLimits {
    pub fn from_avg_moving_range(avg_moving_range: f64) -> Self {
        Self {
            centre: avg_moving_range,
            ucl: D4 * avg_moving_range,
            lcl: 0.0,
        }
    }
}

/// Compute XmR statistics for an ordered run of points
///
/// # Errors
///
/// Returns [`Error::NoData`] for an empty slice.
///
/// # Examples
///
/// ```rust
/// use approx::assert_relative_eq;
/// use spc_chart::compute_xmr;
/// use spc_core::Point;
///
/// let points: Vec<Point> = [10.0, 12.0, 11.0, 13.0]
///     .iter()
///     .enumerate()
///     .map(|(i, &y)| Point::indexed(i, y, None))
///     .collect();
/// let stats = compute_xmr(&points, None, false).unwrap();
/// assert_relative_eq!(stats.avg_moving_range, 5.0 / 3.0);
/// assert_relative_eq!(stats.sigma, 1.478, epsilon = 1e-3);
/// ```
pub fn compute_xmr(points: &[Point], baseline_count: Option<usize>, clamp_lcl: bool) -> Result<XmrStatistics> {
    if points.is_empty() {
        return Err(Error::empty_input("point series"));
    }

    let mut ordered = points.to_vec();
    ordered.sort_by_key(|p| p.x);
    let values = values_of(&ordered);

    let baseline_count_used = resolve_baseline(baseline_count, values.len());
    let baseline = &values[..baseline_count_used];

    let mean = utils::mean(baseline);
    let baseline_ranges = moving_ranges(baseline);
    let avg_moving_range = if baseline_ranges.is_empty() {
        0.0
    } else {
        utils::mean(&baseline_ranges)
    };
    let sigma = if avg_moving_range == 0.0 {
        0.0
    } else {
        avg_moving_range / D2
    };

    let ucl = mean + SIGMA_MULTIPLIER * sigma;
    let raw_lcl = mean - SIGMA_MULTIPLIER * sigma;
    let lcl = if clamp_lcl && raw_lcl < 0.0 { 0.0 } else { raw_lcl };

    let points = ordered
        .into_iter()
        .map(|point| FlaggedPoint {
            beyond_limits: is_beyond_limits(point.y, ucl, lcl, sigma),
            point,
        })
        .collect();

    Ok(XmrStatistics {
        mean,
        sigma,
        avg_moving_range,
        ucl,
        lcl,
        raw_lcl,
        baseline_count_used,
        points,
        moving_ranges: moving_ranges(&values),
    })
}
