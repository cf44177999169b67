//! Rule parameters

use serde::{Deserialize, Serialize};

/// Smallest run or trend length a rule accepts
pub const MIN_RULE_LENGTH: usize = 3;

/// Default points on one side of the centre line that signal a shift
pub const DEFAULT_SHIFT_LENGTH: usize = 8;

/// Default consecutively rising or falling points that signal a trend
pub const DEFAULT_TREND_LENGTH: usize = 6;

/// Lengths used by the shift and trend rules
///
/// Lengths below [`MIN_RULE_LENGTH`] are not rejected; they fall back to the
/// defaults, so any `RuleSettings` value in use is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRuleSettings")]
pub struct RuleSettings {
    /// Points in a run on one side of the centre line
    pub shift_length: usize,
    /// Points in a strictly increasing or decreasing sequence
    pub trend_length: usize,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            shift_length: DEFAULT_SHIFT_LENGTH,
            trend_length: DEFAULT_TREND_LENGTH,
        }
    }
}

impl RuleSettings {
    /// Create settings, replacing lengths below the floor with the defaults
    pub fn new(shift_length: usize, trend_length: usize) -> Self {
        Self {
            shift_length: sanitise(shift_length, DEFAULT_SHIFT_LENGTH),
            trend_length: sanitise(trend_length, DEFAULT_TREND_LENGTH),
        }
    }

    /// Same as [`RuleSettings::new`] for optional user input
    pub fn from_optional(shift_length: Option<usize>, trend_length: Option<usize>) -> Self {
        Self::new(
            shift_length.unwrap_or(DEFAULT_SHIFT_LENGTH),
            trend_length.unwrap_or(DEFAULT_TREND_LENGTH),
        )
    }
}

fn sanitise(length: usize, default: usize) -> usize {
    if length >= MIN_RULE_LENGTH {
        length
    } else {
        default
    }
}

// Deserialisation goes through `new` so the floor also applies to config files
#[derive(Deserialize)]
#[serde(default)]
struct RawRuleSettings {
    shift_length: usize,
    trend_length: usize,
}

impl Default for RawRuleSettings {
    fn default() -> Self {
        let d = RuleSettings::default();
        Self {
            shift_length: d.shift_length,
            trend_length: d.trend_length,
        }
    }
}

impl From<RawRuleSettings> for RuleSettings {
    fn from(raw: RawRuleSettings) -> Self {
        Self::new(raw.shift_length, raw.trend_length)
    }
}
