//! Property-based tests for segmentation and capability

use proptest::prelude::*;
use spc_chart::{compute_xmr, estimate_capability, segment_bounds, segment_points};
use spc_core::{Direction, Point};

fn points_strategy() -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec(-1.0e4..1.0e4f64, 2..80).prop_map(|values| {
        values
            .into_iter()
            .enumerate()
            .map(|(i, y)| Point::indexed(i, y, None))
            .collect()
    })
}

proptest! {
    // Property: without splits, segmentation equals a direct computation
    #[test]
    fn prop_zero_splits_match_direct(
        points in points_strategy(),
        baseline in prop::option::of(0usize..100),
        clamp in any::<bool>()
    ) {
        let segments = segment_points(&points, baseline, &[], clamp).unwrap();
        prop_assert_eq!(segments.len(), 1);
        prop_assert_eq!(&segments[0].statistics, &compute_xmr(&points, baseline, clamp).unwrap());
    }

    // Property: one split at k gives [0, k] and [k + 1, n - 1]
    #[test]
    fn prop_single_split_partitions(points in points_strategy(), k_seed in any::<usize>()) {
        let n = points.len();
        let k = k_seed % (n - 1);
        let segments = segment_points(&points, None, &[k], false).unwrap();
        prop_assert_eq!(segments.len(), 2);
        prop_assert_eq!((segments[0].start_index, segments[0].end_index), (0, k));
        prop_assert_eq!((segments[1].start_index, segments[1].end_index), (k + 1, n - 1));
        prop_assert_eq!(segments[0].len() + segments[1].len(), n);
    }

    // Property: periods are contiguous and cover every index once
    #[test]
    fn prop_bounds_cover_once(n in 1usize..200, splits in prop::collection::vec(0usize..250, 0..20)) {
        let bounds = segment_bounds(n, &splits);
        prop_assert_eq!(bounds[0].0, 0);
        prop_assert_eq!(bounds[bounds.len() - 1].1, n - 1);
        for pair in bounds.windows(2) {
            prop_assert_eq!(pair[0].1 + 1, pair[1].0);
        }
        for &(start, end) in &bounds {
            prop_assert!(start <= end);
        }
    }

    // Property: capability is not applicable whenever sigma <= 0
    #[test]
    fn prop_capability_needs_variation(
        mean in -1.0e6..1.0e6f64,
        sigma in -1.0e3..=0.0f64,
        target in -1.0e6..1.0e6f64,
        above in any::<bool>()
    ) {
        let direction = if above { Direction::Above } else { Direction::Below };
        prop_assert!(estimate_capability(mean, sigma, target, direction).is_none());
    }
}
