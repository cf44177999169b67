//! # spc-charts
//!
//! Statistical process control for small operational datasets: run charts
//! and XmR (individuals and moving range) charts with special-cause
//! detection, user-defined periods and target capability.
//!
//! ## Crates
//!
//! - [`spc_core`]: data model, error type and slice utilities
//! - [`spc_robust`]: MAD and astronomical-point detection
//! - [`spc_parse`]: CSV loading, header and column inference, point extraction
//! - [`spc_rules`]: shift, trend and beyond-limits rules
//! - [`spc_chart`]: limits, periods, capability and chart specifications
//!
//! This crate ties them together: [`analyze`] runs one request end to end,
//! [`SessionState`] keeps interactive state and [`Debouncer`] coalesces
//! bursts of re-triggers.
//!
//! ## Example
//!
//! ```rust
//! use spc_charts::{analyze, AnalysisRequest, ChartKind, SpcConfig};
//! use spc_charts::spc_parse::load_csv;
//!
//! let mut text = String::from("Week,Falls\n");
//! for i in 0..16 {
//!     text.push_str(&format!("2024-03-{:02},{}\n", i + 1, 4 + (i * 5) % 3));
//! }
//! let table = load_csv(&text).unwrap().table;
//!
//! let request = AnalysisRequest::builder("Falls")
//!     .date_column("Week")
//!     .chart(ChartKind::Xmr)
//!     .target(6.0)
//!     .build();
//! let result = analyze(&table, &request, &SpcConfig::default());
//!
//! assert!(result.is_ok());
//! assert_eq!(result.segments.len(), 1);
//! println!("{result}");
//! ```

pub mod analysis;
pub mod config;
pub mod debounce;
pub mod presentation;
pub mod session;
pub mod summary;

pub use spc_chart;
pub use spc_core;
pub use spc_parse;
pub use spc_robust;
pub use spc_rules;

pub use analysis::{
    analyze, try_analyze, AnalysisRequest, AnalysisRequestBuilder, AnalysisResult,
    CapabilityAssessment, Charts, RunAnalysis, SegmentAnalysis, Signal, TargetSetting,
};
pub use config::SpcConfig;
pub use debounce::Debouncer;
pub use presentation::{highlight_points, PointHighlight, RuleFlags};
pub use session::SessionState;

pub use spc_chart::{Annotation, ChartRenderer, ChartSpec, NullChartRenderer};
pub use spc_core::{AxisType, ChartKind, Direction, Error, Point, Result, Table};
pub use spc_parse::Advisory;
pub use spc_rules::RuleSettings;
