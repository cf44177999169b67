//! Median Absolute Deviation (MAD)
//!
//! MAD here is taken around a caller-supplied centre rather than the sample's
//! own median: control charts measure deviation from their centre line.

use spc_core::utils::median;

/// Median of `|v - centre|` over all values
///
/// Returns NaN for an empty slice.
///
/// # Examples
///
/// ```rust
/// use spc_robust::mad;
///
/// // deviations from 3: [2, 1, 0, 1, 97] -> median 1
/// assert_eq!(mad(&[1.0, 2.0, 3.0, 4.0, 100.0], 3.0), 1.0);
/// ```
pub fn mad(values: &[f64], centre: f64) -> f64 {
    let deviations: Vec<f64> = values.iter().map(|v| (v - centre).abs()).collect();
    median(&deviations)
}

/// MAD around the sample's own median
pub fn mad_about_median(values: &[f64]) -> f64 {
    mad(values, median(values))
}
