//! Property-based tests for the shift and trend rules

use proptest::prelude::*;
use spc_rules::{find_long_run_ranges, find_trend_ranges, HitRange, Side};

fn values_strategy() -> impl Strategy<Value = Vec<f64>> {
    // Small integers so ties with the centre and between neighbours occur
    prop::collection::vec((-5i32..=5).prop_map(f64::from), 0..120)
}

proptest! {
    // Property: shift ranges are ordered, disjoint and long enough
    #[test]
    fn prop_long_runs_are_disjoint(values in values_strategy(), run_length in 3usize..10) {
        let ranges = find_long_run_ranges(&values, 0.0, run_length);
        for r in &ranges {
            prop_assert!(r.len >= run_length);
            prop_assert_eq!(r.len, HitRange::len(r));
            prop_assert!(r.end < values.len());
        }
        for pair in ranges.windows(2) {
            prop_assert!(pair[0].end < pair[1].start);
        }
    }

    // Property: every point of a shift range is strictly on its side
    #[test]
    fn prop_long_run_points_on_side(values in values_strategy(), run_length in 3usize..10) {
        for r in find_long_run_ranges(&values, 0.0, run_length) {
            for &v in &values[r.start..=r.end] {
                prop_assert_eq!(Side::of(v, 0.0), Some(r.side));
            }
        }
    }

    // Property: trend ranges have exactly the requested length and are monotone
    #[test]
    fn prop_trends_are_monotone(values in values_strategy(), length in 3usize..8) {
        for r in find_trend_ranges(&values, length) {
            prop_assert_eq!(r.len, length);
            prop_assert_eq!(r.end - r.start + 1, length);
            let window = &values[r.start..=r.end];
            let rising = window.windows(2).all(|w| w[1] > w[0]);
            let falling = window.windows(2).all(|w| w[1] < w[0]);
            prop_assert!(rising || falling);
        }
    }
}
