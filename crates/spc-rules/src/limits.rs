//! Control-limit rule and flag helpers

use crate::types::HitRange;

/// Whether a value lies strictly outside the control limits
///
/// Never true when `sigma` is zero: collapsed limits carry no signal.
pub fn is_beyond_limits(value: f64, ucl: f64, lcl: f64, sigma: f64) -> bool {
    sigma > 0.0 && (value > ucl || value < lcl)
}

/// Indices of values strictly outside the control limits
pub fn beyond_limits(values: &[f64], ucl: f64, lcl: f64, sigma: f64) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, &v)| is_beyond_limits(v, ucl, lcl, sigma).then_some(i))
        .collect()
}

/// One flag per point, set for every index covered by a range
pub fn flags_from_ranges<R: HitRange>(n: usize, ranges: &[R]) -> Vec<bool> {
    let mut flags = vec![false; n];
    for r in ranges {
        for flag in flags.iter_mut().take(r.end() + 1).skip(r.start()) {
            *flag = true;
        }
    }
    flags
}

/// One flag per point, set for each listed index
pub fn flags_from_indices(n: usize, indices: &[usize]) -> Vec<bool> {
    let mut flags = vec![false; n];
    for &i in indices {
        if let Some(flag) = flags.get_mut(i) {
            *flag = true;
        }
    }
    flags
}
