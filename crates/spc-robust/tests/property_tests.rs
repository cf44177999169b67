//! Property-based tests for astronomical point detection

use proptest::prelude::*;
use spc_robust::astronomical_points;

proptest! {
    // Property: identical values have MAD 0 and never produce outliers
    #[test]
    fn prop_flat_series_has_no_outliers(value in -1.0e6..1.0e6f64, n in 1usize..300) {
        let values = vec![value; n];
        let report = astronomical_points(&values, value, None);
        prop_assert!(report.indices.is_empty());
        prop_assert_eq!(report.flags.len(), n);
        prop_assert_eq!(report.mad, 0.0);
    }

    // Property: flags and indices always agree
    #[test]
    fn prop_flags_match_indices(values in prop::collection::vec(-100.0..100.0f64, 0..200)) {
        let centre = spc_core::utils::median(&values);
        let report = astronomical_points(&values, centre, None);
        prop_assert_eq!(report.flags.len(), values.len());
        let from_flags: Vec<usize> = report.flags.iter().enumerate()
            .filter_map(|(i, &f)| f.then_some(i))
            .collect();
        prop_assert_eq!(from_flags, report.indices);
    }
}
