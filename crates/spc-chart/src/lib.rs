//! Control chart computation
//!
//! This crate turns an ordered point series into chart statistics:
//!
//! - [`xmr`]: mean, moving ranges, sigma and control limits (with optional
//!   LCL clamping) plus moving-range chart limits
//! - [`run`]: the median centre line of a run chart
//! - [`segment`]: periods defined by user splits, each with its own limits
//! - [`capability`]: probability of meeting a target and observed coverage
//! - [`render`]: chart specifications and the [`ChartRenderer`] interface
//!
//! # Example
//!
//! ```rust
//! use spc_chart::{estimate_capability, segment_points};
//! use spc_core::{Direction, Point};
//!
//! let points: Vec<Point> = (0..24)
//!     .map(|i| Point::indexed(i, 50.0 + ((i * 7) % 5) as f64, None))
//!     .collect();
//!
//! // Split after the twelfth point: two periods of twelve
//! let segments = segment_points(&points, None, &[11], false).unwrap();
//! assert_eq!(segments.len(), 2);
//!
//! let last = &segments[1].statistics;
//! let capability = estimate_capability(last.mean, last.sigma, 48.0, Direction::Above);
//! assert!(capability.unwrap().probability > 0.5);
//! ```

pub mod capability;
pub mod render;
pub mod run;
pub mod segment;
pub mod xmr;

pub use capability::{estimate_capability, normal_cdf, target_coverage, Capability, TargetCoverage};
pub use render::{
    markers_for, mr_chart_spec, run_chart_spec, xmr_chart_spec, Annotation, ChartLabels,
    ChartRenderer, ChartSpec, NullChartRenderer, Series, SeriesStyle, VerticalMarker,
};
pub use run::{compute_run, RunStatistics};
pub use segment::{normalize_splits, segment_bounds, segment_points, Segment};
pub use xmr::{compute_xmr, resolve_baseline, FlaggedPoint, MrLimits, XmrStatistics, D2, D4};
