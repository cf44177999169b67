//! Mapping rule flags to point highlights
//!
//! Kept apart from rule detection: the rules report which points fired,
//! this module decides how each point is shown.

use serde::{Deserialize, Serialize};

/// How a single point is shown on the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointHighlight {
    #[default]
    Default,
    /// Beyond the limits, or part of a shift or trend
    Signal,
    /// Astronomical point
    Outlier,
}

/// Per-point rule flags over the whole series
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleFlags {
    pub astronomical: Vec<bool>,
    pub beyond_limits: Vec<bool>,
    pub shift: Vec<bool>,
    pub trend: Vec<bool>,
}

impl RuleFlags {
    /// All-clear flags for `n` points
    pub fn new(n: usize) -> Self {
        Self {
            astronomical: vec![false; n],
            beyond_limits: vec![false; n],
            shift: vec![false; n],
            trend: vec![false; n],
        }
    }

    pub fn len(&self) -> usize {
        self.astronomical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.astronomical.is_empty()
    }

    /// Copy a period's local flags into place starting at `offset`
    pub fn splice(&mut self, offset: usize, local: &RuleFlags) {
        let targets = [
            (&mut self.astronomical, &local.astronomical),
            (&mut self.beyond_limits, &local.beyond_limits),
            (&mut self.shift, &local.shift),
            (&mut self.trend, &local.trend),
        ];
        for (global, part) in targets {
            for (dst, &src) in global.iter_mut().skip(offset).zip(part) {
                *dst = src;
            }
        }
    }

    fn highlight_at(&self, i: usize) -> PointHighlight {
        let set = |flags: &[bool]| flags.get(i).copied().unwrap_or(false);
        if set(&self.astronomical) {
            PointHighlight::Outlier
        } else if set(&self.beyond_limits) || set(&self.shift) || set(&self.trend) {
            PointHighlight::Signal
        } else {
            PointHighlight::Default
        }
    }
}

/// One highlight per point
///
/// Astronomical points outrank every other rule. With flagging disabled
/// every point is [`PointHighlight::Default`].
pub fn highlight_points(flags: &RuleFlags, flag_special_causes: bool) -> Vec<PointHighlight> {
    if !flag_special_causes {
        return vec![PointHighlight::Default; flags.len()];
    }
    (0..flags.len()).map(|i| flags.highlight_at(i)).collect()
}
