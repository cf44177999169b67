//! Property-based tests for the slice utilities

use proptest::prelude::*;
use spc_core::utils::{median, moving_ranges};

proptest! {
    // Property: the median does not depend on input order
    #[test]
    fn prop_median_order_invariant(
        mut values in prop::collection::vec(-1.0e6..1.0e6f64, 1..200),
        seed in any::<u64>()
    ) {
        let before = median(&values);
        // Deterministic shuffle driven by the seed
        let n = values.len();
        let mut state = seed;
        for i in (1..n).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (state >> 33) as usize % (i + 1);
            values.swap(i, j);
        }
        prop_assert_eq!(before, median(&values));
    }

    // Property: appending the median an even number of times keeps it
    #[test]
    fn prop_median_stable_under_even_median_padding(
        values in prop::collection::vec(-1.0e3..1.0e3f64, 1..100),
        pairs in 1usize..10
    ) {
        let m = median(&values);
        let mut padded = values.clone();
        for _ in 0..(2 * pairs) {
            padded.push(m);
        }
        prop_assert!((median(&padded) - m).abs() <= 1e-9 * m.abs().max(1.0));
    }

    // Property: moving ranges are non-negative and one shorter than the input
    #[test]
    fn prop_moving_ranges_shape(values in prop::collection::vec(-1.0e6..1.0e6f64, 2..200)) {
        let mr = moving_ranges(&values);
        prop_assert_eq!(mr.len(), values.len() - 1);
        prop_assert!(mr.iter().all(|&r| r >= 0.0));
    }
}
