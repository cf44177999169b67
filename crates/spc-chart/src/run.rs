//! Run chart centre line

use crate::xmr::resolve_baseline;
use serde::{Deserialize, Serialize};
use spc_core::utils::median;
use spc_core::{values_of, Error, Point, Result};

/// Centre line of a run chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Median of the baseline values
    pub median: f64,
    pub baseline_count_used: usize,
}

/// Median of the baseline slice of an ordered run of points
pub fn compute_run(points: &[Point], baseline_count: Option<usize>) -> Result<RunStatistics> {
    if points.is_empty() {
        return Err(Error::empty_input("point series"));
    }
    let values = values_of(points);
    let baseline_count_used = resolve_baseline(baseline_count, values.len());
    Ok(RunStatistics {
        median: median(&values[..baseline_count_used]),
        baseline_count_used,
    })
}
