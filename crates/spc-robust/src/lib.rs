//! Robust statistics for control charts
//!
//! This crate provides the outlier machinery behind the "astronomical point"
//! rule:
//! - [`mad`]: Median Absolute Deviation around a chosen centre
//! - [`outlier`]: modified z-score scoring and flagging
//!
//! # Overview
//!
//! Control limits derived from moving ranges are themselves pulled around by
//! extreme values. The modified z-score uses the MAD of a reference slice
//! (the baseline) instead, which has a 50% breakdown point, so a single
//! extreme point stands out clearly.
//!
//! # Example
//!
//! ```rust
//! use spc_robust::astronomical_points;
//!
//! let values = vec![10.0, 11.0, 9.0, 10.0, 11.0, 9.0, 10.0, 60.0];
//! let report = astronomical_points(&values, 10.0, None);
//! assert_eq!(report.indices, vec![7]);
//! ```

pub mod mad;
pub mod outlier;

pub use mad::{mad, mad_about_median};
pub use outlier::{
    astronomical_points, AstronomicalDetector, OutlierReport, DEFAULT_THRESHOLD,
    MODIFIED_Z_CONSTANT,
};
