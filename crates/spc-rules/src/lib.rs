//! Special-cause detection rules for control charts
//!
//! Every rule works on an ordered slice of values and returns plain index
//! data; deciding how a flagged point is displayed is left to the caller.
//!
//! - **Shift**: [`find_long_run_ranges`], a run of points on one side of the
//!   centre line (default 8)
//! - **Trend**: [`find_trend_ranges`], consecutively rising or falling
//!   points (default 6)
//! - **Beyond limits**: [`beyond_limits`], points strictly outside the
//!   control limits
//!
//! The astronomical-point rule lives in `spc-robust`.
//!
//! # Example
//!
//! ```rust
//! use spc_rules::{find_long_run_ranges, find_trend_ranges, flags_from_ranges, RuleSettings};
//!
//! let settings = RuleSettings::default();
//! let values = [4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 6.0, 6.0];
//!
//! let shifts = find_long_run_ranges(&values, 5.0, settings.shift_length);
//! assert_eq!(shifts.len(), 1);
//! assert!(find_trend_ranges(&values, settings.trend_length).is_empty());
//!
//! let flags = flags_from_ranges(values.len(), &shifts);
//! assert_eq!(flags.iter().filter(|&&f| f).count(), 8);
//! ```

pub mod limits;
pub mod runs;
pub mod settings;
pub mod types;

pub use limits::{beyond_limits, flags_from_indices, flags_from_ranges, is_beyond_limits};
pub use runs::{find_long_run_ranges, find_trend_ranges};
pub use settings::{RuleSettings, DEFAULT_SHIFT_LENGTH, DEFAULT_TREND_LENGTH, MIN_RULE_LENGTH};
pub use types::{HitRange, RunRange, Side, TrendDirection, TrendRange};
