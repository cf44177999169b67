//! Capability against a target
//!
//! Assuming a stable, roughly normal process with the period's mean and
//! sigma, estimates the share of future points that will meet a target.

use serde::{Deserialize, Serialize};
use spc_core::Direction;
use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;

/// Standard normal cumulative distribution function
///
/// # Examples
///
/// ```rust
/// use approx::assert_relative_eq;
/// use spc_chart::normal_cdf;
///
/// assert_relative_eq!(normal_cdf(0.0), 0.5);
/// assert_relative_eq!(normal_cdf(1.96), 0.975, epsilon = 1e-4);
/// ```
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / SQRT_2)
}

/// Estimated probability of meeting a target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    /// Probability in `[0, 1]`
    pub probability: f64,
    /// `(target - mean) / sigma`
    pub z: f64,
}

/// Probability that a point meets `target` in `direction`
///
/// Returns `None` (not applicable) unless `sigma > 0` and every input is
/// finite.
pub fn estimate_capability(mean: f64, sigma: f64, target: f64, direction: Direction) -> Option<Capability> {
    if !mean.is_finite() || !sigma.is_finite() || sigma <= 0.0 || !target.is_finite() {
        return None;
    }
    let z = (target - mean) / sigma;
    let probability = match direction {
        Direction::Above => 1.0 - normal_cdf(z),
        Direction::Below => normal_cdf(z),
    };
    Some(Capability { probability, z })
}

/// Observed share of points meeting a target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetCoverage {
    pub hits: usize,
    pub total: usize,
    /// `hits / total`, zero for an empty period
    pub proportion: f64,
}

/// Count the values meeting `target` (`>=` above, `<=` below)
pub fn target_coverage(values: &[f64], target: f64, direction: Direction) -> TargetCoverage {
    let hits = values.iter().filter(|&&v| direction.meets(v, target)).count();
    let total = values.len();
    TargetCoverage {
        hits,
        total,
        proportion: if total == 0 { 0.0 } else { hits as f64 / total as f64 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normal_cdf_symmetry() {
        for z in [-3.0, -1.0, -0.25, 0.5, 2.0] {
            assert_relative_eq!(normal_cdf(z) + normal_cdf(-z), 1.0, epsilon = 1e-12);
        }
        assert_relative_eq!(normal_cdf(-1.0), 0.158_655_253_9, epsilon = 1e-9);
    }

    #[test]
    fn test_capability_directions() {
        let above = estimate_capability(10.0, 2.0, 10.0, Direction::Above).unwrap();
        assert_relative_eq!(above.probability, 0.5);
        assert_relative_eq!(above.z, 0.0);

        // Target one sigma below the mean: most points are above it
        let above = estimate_capability(10.0, 2.0, 8.0, Direction::Above).unwrap();
        assert_relative_eq!(above.probability, 0.841_344_746, epsilon = 1e-8);
        let below = estimate_capability(10.0, 2.0, 8.0, Direction::Below).unwrap();
        assert_relative_eq!(below.probability, 1.0 - above.probability, epsilon = 1e-12);
    }

    #[test]
    fn test_not_applicable_without_variation() {
        assert!(estimate_capability(10.0, 0.0, 5.0, Direction::Above).is_none());
        assert!(estimate_capability(10.0, -1.0, 5.0, Direction::Below).is_none());
        assert!(estimate_capability(f64::NAN, 1.0, 5.0, Direction::Above).is_none());
        assert!(estimate_capability(10.0, 1.0, f64::INFINITY, Direction::Above).is_none());
    }

    #[test]
    fn test_target_coverage() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let above = target_coverage(&values, 3.0, Direction::Above);
        assert_eq!((above.hits, above.total), (2, 4));
        assert_relative_eq!(above.proportion, 0.5);
        let below = target_coverage(&values, 3.0, Direction::Below);
        assert_eq!(below.hits, 3);
        assert_eq!(target_coverage(&[], 1.0, Direction::Above).proportion, 0.0);
    }
}
