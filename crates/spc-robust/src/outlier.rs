//! Astronomical point detection using the modified z-score
//!
//! `z_i = 0.6745 * (x_i - centre) / MAD`, flagged when `|z_i| > threshold`
//! (Iglewicz & Hoaglin's 3.5 rule of thumb by default). The MAD is measured
//! over a reference slice, normally the period's baseline, so a late
//! excursion cannot inflate its own yardstick.

use crate::mad::mad;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Consistency constant relating MAD to the standard normal
pub const MODIFIED_Z_CONSTANT: f64 = 0.6745;

/// Default cut-off on `|z|`
pub const DEFAULT_THRESHOLD: f64 = 3.5;

/// Reference slices shorter than this fall back to the full series
pub const MIN_REFERENCE_LEN: usize = 3;

/// Outcome of an astronomical-point scan
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutlierReport {
    /// Indices of flagged points, ascending
    pub indices: Vec<usize>,
    /// One flag per input value
    pub flags: Vec<bool>,
    /// MAD used for scoring; 0 when the test was not applicable
    pub mad: f64,
}

impl OutlierReport {
    fn unflagged(n: usize) -> Self {
        Self {
            indices: Vec::new(),
            flags: vec![false; n],
            mad: 0.0,
        }
    }

    pub fn has_outliers(&self) -> bool {
        !self.indices.is_empty()
    }
}

/// Modified z-score outlier detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AstronomicalDetector {
    threshold: f64,
}

impl Default for AstronomicalDetector {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl AstronomicalDetector {
    /// Create a detector with a custom `|z|` threshold
    ///
    /// Non-finite or non-positive thresholds fall back to the default.
    pub fn new(threshold: f64) -> Self {
        if threshold.is_finite() && threshold > 0.0 {
            Self { threshold }
        } else {
            Self::default()
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Modified z-score of one value, or `None` when the MAD is degenerate
    pub fn score(&self, value: f64, centre: f64, mad: f64) -> Option<f64> {
        if mad == 0.0 || !mad.is_finite() {
            return None;
        }
        Some(MODIFIED_Z_CONSTANT * (value - centre) / mad)
    }

    /// Flag values whose modified z-score exceeds the threshold
    ///
    /// `reference` supplies the MAD; with fewer than three reference values
    /// the full `values` slice is used instead. A zero or non-finite MAD
    /// (flat data) flags nothing.
    pub fn detect(&self, values: &[f64], centre: f64, reference: Option<&[f64]>) -> OutlierReport {
        let reference = match reference {
            Some(r) if r.len() >= MIN_REFERENCE_LEN => r,
            _ => values,
        };
        let mad = mad(reference, centre);

        if mad == 0.0 || !mad.is_finite() {
            debug!(n = values.len(), "MAD is degenerate, astronomical test not applicable");
            return OutlierReport::unflagged(values.len());
        }

        let flags: Vec<bool> = values
            .iter()
            .map(|&v| (MODIFIED_Z_CONSTANT * (v - centre) / mad).abs() > self.threshold)
            .collect();
        let indices = flags
            .iter()
            .enumerate()
            .filter_map(|(i, &f)| f.then_some(i))
            .collect();

        OutlierReport { indices, flags, mad }
    }
}

/// Convenience wrapper using the default 3.5 threshold
pub fn astronomical_points(values: &[f64], centre: f64, reference: Option<&[f64]>) -> OutlierReport {
    AstronomicalDetector::default().detect(values, centre, reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flags_single_spike() {
        let values = vec![10.0, 11.0, 9.0, 10.0, 11.0, 9.0, 10.0, 60.0];
        let report = astronomical_points(&values, 10.0, None);
        assert_eq!(report.indices, vec![7]);
        assert!(report.flags[7]);
        assert_relative_eq!(report.mad, 1.0);
    }

    #[test]
    fn test_flat_data_flags_nothing() {
        let values = vec![5.0; 10];
        let report = astronomical_points(&values, 5.0, None);
        assert!(!report.has_outliers());
        assert_eq!(report.flags, vec![false; 10]);
        assert_eq!(report.mad, 0.0);
    }

    #[test]
    fn test_short_reference_falls_back_to_values() {
        let values = vec![10.0, 11.0, 9.0, 10.0, 40.0];
        // A two-value reference is ignored; MAD comes from `values`
        let with_short_ref = astronomical_points(&values, 10.0, Some(&[10.0, 10.0]));
        let without_ref = astronomical_points(&values, 10.0, None);
        assert_eq!(with_short_ref, without_ref);
    }

    #[test]
    fn test_reference_slice_sets_scale() {
        // Baseline is tight, later values drift far away
        let values = vec![10.0, 10.5, 9.5, 10.0, 14.0];
        let baseline = &values[..4];
        let report = astronomical_points(&values, 10.0, Some(baseline));
        assert_eq!(report.indices, vec![4]);
    }

    #[test]
    fn test_score_and_degenerate_mad() {
        let detector = AstronomicalDetector::new(3.5);
        let z = detector.score(10.0 + 3.5 / MODIFIED_Z_CONSTANT, 10.0, 1.0).unwrap();
        assert_relative_eq!(z, 3.5, epsilon = 1e-12);
        assert!(detector.score(1.0, 0.0, 0.0).is_none());
        assert!(detector.score(1.0, 0.0, f64::NAN).is_none());
    }

    #[test]
    fn test_invalid_threshold_uses_default() {
        assert_eq!(AstronomicalDetector::new(-1.0).threshold(), DEFAULT_THRESHOLD);
        assert_eq!(AstronomicalDetector::new(f64::NAN).threshold(), DEFAULT_THRESHOLD);
        assert_eq!(AstronomicalDetector::new(2.0).threshold(), 2.0);
    }
}
