//! Utility functions for working with value slices

/// Sort data and return a new vector
///
/// Handles NaN values by placing them at the end.
///
/// # Examples
///
/// ```rust
/// use spc_core::utils::sorted;
///
/// let data = vec![3.0, 1.0, 5.0, 2.0, 4.0];
/// assert_eq!(sorted(&data), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
/// ```
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| match (a.is_nan(), b.is_nan()) {
        (true, true) => std::cmp::Ordering::Equal,
        (true, false) => std::cmp::Ordering::Greater,
        (false, true) => std::cmp::Ordering::Less,
        (false, false) => a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal),
    });
    sorted
}

/// Calculate the mean of a slice
///
/// Returns NaN for empty slices; callers decide what an empty baseline means.
///
/// # Examples
///
/// ```rust
/// use spc_core::utils::mean;
///
/// assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
/// assert!(mean(&[]).is_nan());
/// ```
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Calculate the median of a slice
///
/// Even-length slices average the two middle elements. Returns NaN for
/// empty slices.
///
/// # Examples
///
/// ```rust
/// use spc_core::utils::median;
///
/// assert_eq!(median(&[5.0, 1.0, 3.0]), 3.0);
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
/// ```
pub fn median(data: &[f64]) -> f64 {
    let s = sorted(data);
    let n = s.len();
    if n == 0 {
        return f64::NAN;
    }
    if n % 2 == 1 {
        s[n / 2]
    } else {
        (s[n / 2 - 1] + s[n / 2]) / 2.0
    }
}

/// Absolute differences between consecutive values
///
/// Returns `len - 1` values, or nothing for fewer than two inputs.
///
/// # Examples
///
/// ```rust
/// use spc_core::utils::moving_ranges;
///
/// assert_eq!(moving_ranges(&[10.0, 12.0, 11.0, 13.0]), vec![2.0, 1.0, 2.0]);
/// ```
pub fn moving_ranges(data: &[f64]) -> Vec<f64> {
    data.windows(2).map(|w| (w[1] - w[0]).abs()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sorted_basic() {
        let data = vec![3.0, 1.0, 5.0, 2.0, 4.0];
        assert_eq!(sorted(&data), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_sorted_with_nan() {
        let data = vec![3.0, f64::NAN, 1.0, 2.0];
        let sorted_data = sorted(&data);

        assert_eq!(sorted_data[0], 1.0);
        assert_eq!(sorted_data[1], 2.0);
        assert_eq!(sorted_data[2], 3.0);
        assert!(sorted_data[3].is_nan());
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[10.0, 12.0, 11.0, 13.0]), 11.5);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[9.0]), 9.0);
        assert_eq!(median(&[1.0, 9.0]), 5.0);
        assert_eq!(median(&[7.0, 1.0, 3.0, 100.0, 5.0]), 5.0);
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn test_moving_ranges() {
        assert!(moving_ranges(&[]).is_empty());
        assert!(moving_ranges(&[1.0]).is_empty());

        let mr = moving_ranges(&[10.0, 12.0, 11.0, 13.0]);
        assert_eq!(mr, vec![2.0, 1.0, 2.0]);
        assert_relative_eq!(mean(&mr), 5.0 / 3.0, epsilon = 1e-12);
    }
}
