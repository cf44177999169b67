//! Analysis configuration
//!
//! Resolved once (from defaults or a JSON file) and passed to every
//! analysis; nothing checks for optional behaviour at run time.

use serde::{Deserialize, Serialize};
use spc_chart::ChartLabels;
use spc_core::{Error, Result, MIN_POINTS_ANY_CHART, MIN_POINTS_XMR};
use spc_robust::DEFAULT_THRESHOLD;
use spc_rules::RuleSettings;
use std::time::Duration;

/// Quiet period before a re-triggered analysis runs
pub const DEFAULT_DEBOUNCE_MS: u64 = 80;

/// Behaviour switches and thresholds shared by every analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpcConfig {
    /// Highlight special-cause points on the chart
    pub flag_special_causes: bool,
    /// Build the moving-range chart alongside an XmR chart
    pub show_mr_chart: bool,
    /// `|z|` cut-off of the astronomical-point rule
    pub astronomical_threshold: f64,
    /// Fewest valid points for any chart; never below 3
    pub min_points: usize,
    /// Fewest valid points for an XmR chart; never below `min_points`
    pub min_points_xmr: usize,
    pub debounce_ms: u64,
    /// Defaults for requests that do not set their own rule lengths
    pub rules: RuleSettings,
    pub captions: ChartLabels,
}

impl Default for SpcConfig {
    fn default() -> Self {
        Self {
            flag_special_causes: true,
            show_mr_chart: true,
            astronomical_threshold: DEFAULT_THRESHOLD,
            min_points: MIN_POINTS_ANY_CHART,
            min_points_xmr: MIN_POINTS_XMR,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            rules: RuleSettings::default(),
            captions: ChartLabels::default(),
        }
    }
}

impl SpcConfig {
    /// Parse a JSON document; missing fields take their defaults
    ///
    /// # Examples
    ///
    /// ```rust
    /// use spc_charts::SpcConfig;
    ///
    /// let config = SpcConfig::from_json(r#"{ "show_mr_chart": false, "min_points": 1 }"#).unwrap();
    /// assert!(!config.show_mr_chart);
    /// assert_eq!(config.min_points, 3);
    /// assert_eq!(config.rules.shift_length, 8);
    /// ```
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| Error::InvalidParameter(format!("configuration: {e}")))?;
        Ok(config.sanitised())
    }

    /// Raise point minimums to their floors and reset a bad threshold
    pub fn sanitised(mut self) -> Self {
        self.min_points = self.min_points.max(MIN_POINTS_ANY_CHART);
        self.min_points_xmr = self.min_points_xmr.max(self.min_points);
        if !(self.astronomical_threshold.is_finite() && self.astronomical_threshold > 0.0) {
            self.astronomical_threshold = DEFAULT_THRESHOLD;
        }
        self
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SpcConfig::default();
        assert!(config.flag_special_causes);
        assert!(config.show_mr_chart);
        assert_eq!(config.astronomical_threshold, 3.5);
        assert_eq!((config.min_points, config.min_points_xmr), (3, 12));
        assert_eq!(config.debounce_window(), Duration::from_millis(80));
    }

    #[test]
    fn test_json_overrides_and_floors() {
        let config = SpcConfig::from_json(
            r#"{
                "flag_special_causes": false,
                "astronomical_threshold": -2,
                "min_points_xmr": 2,
                "rules": { "shift_length": 2, "trend_length": 7 },
                "captions": { "title": "Falls per 1,000 bed days" }
            }"#,
        )
        .unwrap();
        assert!(!config.flag_special_causes);
        assert_eq!(config.astronomical_threshold, 3.5);
        assert_eq!(config.min_points_xmr, 3);
        assert_eq!(config.rules, RuleSettings::new(8, 7));
        assert_eq!(config.captions.title.as_deref(), Some("Falls per 1,000 bed days"));
    }

    #[test]
    fn test_bad_json_is_invalid_parameter() {
        assert!(matches!(
            SpcConfig::from_json("{ not json"),
            Err(Error::InvalidParameter(_))
        ));
    }
}
