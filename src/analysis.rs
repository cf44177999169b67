//! The analysis entry point
//!
//! [`analyze`] runs the whole pipeline for one request: points are
//! extracted, periods computed, every rule evaluated per period and the
//! results collected into an [`AnalysisResult`]. Blocking problems are
//! reported in [`AnalysisResult::error`] rather than returned as `Err`.

use crate::config::SpcConfig;
use crate::presentation::{highlight_points, PointHighlight, RuleFlags};
use serde::{Deserialize, Serialize};
use spc_chart::{
    compute_run, estimate_capability, mr_chart_spec, run_chart_spec, segment_points,
    target_coverage, xmr_chart_spec, Annotation, Capability, ChartSpec, RunStatistics, Segment,
    TargetCoverage,
};
use spc_core::{values_of, AxisType, ChartKind, Direction, Error, Point, Result, Table};
use spc_parse::{extract_points, Advisory, ColumnGuess};
use spc_robust::{AstronomicalDetector, OutlierReport};
use spc_rules::{
    find_long_run_ranges, find_trend_ranges, flags_from_indices, flags_from_ranges, RuleSettings,
    RunRange, TrendRange,
};
use std::fmt;
use tracing::{debug, instrument};

pub(crate) const NO_DATA_MESSAGE: &str = "No data loaded yet. Load a CSV file or paste data first.";

/// Everything one analysis needs besides the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub chart: ChartKind,
    /// x column; optional only on a sequence axis
    pub date_column: Option<String>,
    pub value_column: String,
    pub axis: AxisType,
    pub baseline_count: Option<usize>,
    /// Split after each listed point index
    pub splits: Vec<usize>,
    pub rules: RuleSettings,
    pub clamp_lcl: bool,
    /// Always finite when set
    pub target: Option<f64>,
    pub direction: Direction,
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub advisories: Vec<Advisory>,
}

impl AnalysisRequest {
    pub fn builder(value_column: impl Into<String>) -> AnalysisRequestBuilder {
        AnalysisRequestBuilder::new(value_column)
    }

    /// Builder from inferred columns, carrying the guess's advisories
    ///
    /// Without a date candidate the axis is a sequence and the guessed x
    /// column supplies point labels. `None` when the table has no columns.
    pub fn from_guess(guess: &ColumnGuess) -> Option<AnalysisRequestBuilder> {
        let value_column = guess.value_column.clone()?;
        let axis = if guess.has_date_candidate {
            AxisType::Date
        } else {
            AxisType::Sequence
        };
        let mut builder = AnalysisRequestBuilder::new(value_column)
            .axis(axis)
            .advisories(guess.advisories());
        if let Some(column) = &guess.date_column {
            builder = builder.date_column(column.clone());
        }
        Some(builder)
    }
}

/// Builder for [`AnalysisRequest`]
#[derive(Debug, Clone)]
pub struct AnalysisRequestBuilder {
    request: AnalysisRequest,
}

impl AnalysisRequestBuilder {
    /// Run chart on a date axis with default rules and no target
    pub fn new(value_column: impl Into<String>) -> Self {
        Self {
            request: AnalysisRequest {
                chart: ChartKind::default(),
                date_column: None,
                value_column: value_column.into(),
                axis: AxisType::default(),
                baseline_count: None,
                splits: Vec::new(),
                rules: RuleSettings::default(),
                clamp_lcl: false,
                target: None,
                direction: Direction::default(),
                annotations: Vec::new(),
                advisories: Vec::new(),
            },
        }
    }

    pub fn chart(mut self, chart: ChartKind) -> Self {
        self.request.chart = chart;
        self
    }

    pub fn date_column(mut self, column: impl Into<String>) -> Self {
        self.request.date_column = Some(column.into());
        self
    }

    pub fn value_column(mut self, column: impl Into<String>) -> Self {
        self.request.value_column = column.into();
        self
    }

    pub fn axis(mut self, axis: AxisType) -> Self {
        self.request.axis = axis;
        self
    }

    /// Use the first `count` points as the baseline; below 2 means all points
    pub fn baseline(mut self, count: usize) -> Self {
        self.request.baseline_count = Some(count);
        self
    }

    /// Split after point `index`
    pub fn split_after(mut self, index: usize) -> Self {
        self.request.splits.push(index);
        self
    }

    pub fn splits(mut self, splits: impl IntoIterator<Item = usize>) -> Self {
        self.request.splits = splits.into_iter().collect();
        self
    }

    pub fn rules(mut self, rules: RuleSettings) -> Self {
        self.request.rules = rules;
        self
    }

    pub fn clamp_lcl(mut self, clamp: bool) -> Self {
        self.request.clamp_lcl = clamp;
        self
    }

    /// Set a target; non-finite values clear it
    pub fn target(mut self, target: f64) -> Self {
        self.request.target = target.is_finite().then_some(target);
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.request.direction = direction;
        self
    }

    pub fn annotate(mut self, date: impl Into<String>, label: impl Into<String>) -> Self {
        self.request.annotations.push(Annotation::new(date, label));
        self
    }

    pub fn annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.request.annotations = annotations;
        self
    }

    /// Carry column-inference hints through to the result
    pub fn advisories(mut self, advisories: Vec<Advisory>) -> Self {
        self.request.advisories = advisories;
        self
    }

    pub fn build(self) -> AnalysisRequest {
        self.request
    }
}

/// A special-cause signal found in a period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    BeyondLimits,
    SustainedShift,
    SustainedTrend,
    AstronomicalPoint,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::BeyondLimits => write!(f, "one or more points are outside the control limits"),
            Signal::SustainedShift => write!(
                f,
                "a sustained shift (many points on the same side of the mean)"
            ),
            Signal::SustainedTrend => write!(f, "a sustained trend (steady increase or decrease)"),
            Signal::AstronomicalPoint => write!(f, "an unusual outlier (an ‘astronomical’ point)"),
        }
    }
}

/// Whether a capability figure may be reported for a period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CapabilityAssessment {
    /// No target, or no variation to estimate from
    NotApplicable,
    /// Estimate withheld: the period shows special-cause signals
    Unstable,
    /// Stable period with an estimate
    Estimated(Capability),
}

impl CapabilityAssessment {
    fn assess(mean: f64, sigma: f64, target: Option<f64>, direction: Direction, signals: &[Signal]) -> Self {
        let Some(capability) = target.and_then(|t| estimate_capability(mean, sigma, t, direction)) else {
            return Self::NotApplicable;
        };
        if signals.is_empty() {
            Self::Estimated(capability)
        } else {
            Self::Unstable
        }
    }

    /// The estimate, when it may be shown
    pub fn estimate(&self) -> Option<&Capability> {
        match self {
            Self::Estimated(c) => Some(c),
            _ => None,
        }
    }
}

/// Target and the side of it that counts as meeting it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSetting {
    pub value: f64,
    pub direction: Direction,
}

/// Rules evaluated over a run chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunAnalysis {
    pub statistics: RunStatistics,
    pub shifts: Vec<RunRange>,
    pub trends: Vec<TrendRange>,
    pub astronomical: OutlierReport,
    pub signals: Vec<Signal>,
    pub target_coverage: Option<TargetCoverage>,
}

/// One XmR period with its rule results
///
/// Local indices count from the start of the period; `*_global` fields
/// hold the same points indexed over the whole series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentAnalysis {
    pub segment: Segment,
    pub beyond_limits: Vec<usize>,
    pub shifts: Vec<RunRange>,
    pub trends: Vec<TrendRange>,
    pub astronomical: OutlierReport,
    pub beyond_limits_global: Vec<usize>,
    pub astronomical_global: Vec<usize>,
    pub signals: Vec<Signal>,
    pub capability: CapabilityAssessment,
    pub target_coverage: Option<TargetCoverage>,
}

impl SegmentAnalysis {
    pub fn is_stable(&self) -> bool {
        self.signals.is_empty()
    }
}

/// Chart specifications ready for a renderer
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Charts {
    pub main: Option<ChartSpec>,
    pub moving_range: Option<ChartSpec>,
}

/// Outcome of one analysis
///
/// On a blocking error only `chart`, `advisories` and `error` are filled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub chart: ChartKind,
    pub labels: Vec<String>,
    pub points: Vec<Point>,
    pub rules: RuleSettings,
    pub target: Option<TargetSetting>,
    /// Present for run charts
    pub run: Option<RunAnalysis>,
    /// Present for XmR charts, one per period
    pub segments: Vec<SegmentAnalysis>,
    /// Assessment of the last period
    pub capability: CapabilityAssessment,
    pub flags: RuleFlags,
    pub highlights: Vec<PointHighlight>,
    /// Some period's lower limit falls below zero before clamping
    pub any_raw_lcl_below_zero: bool,
    pub charts: Charts,
    pub advisories: Vec<Advisory>,
    pub error: Option<Error>,
}

impl AnalysisResult {
    fn failed(request: &AnalysisRequest, error: Error) -> Self {
        Self {
            chart: request.chart,
            labels: Vec::new(),
            points: Vec::new(),
            rules: request.rules,
            target: None,
            run: None,
            segments: Vec::new(),
            capability: CapabilityAssessment::NotApplicable,
            flags: RuleFlags::default(),
            highlights: Vec::new(),
            any_raw_lcl_below_zero: false,
            charts: Charts::default(),
            advisories: request.advisories.clone(),
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Every signal across the run chart or all periods, deduplicated
    pub fn signals(&self) -> Vec<Signal> {
        let found: Vec<Signal> = match &self.run {
            Some(run) => run.signals.clone(),
            None => self.segments.iter().flat_map(|s| s.signals.iter().copied()).collect(),
        };
        let mut unique = Vec::with_capacity(found.len());
        for signal in found {
            if !unique.contains(&signal) {
                unique.push(signal);
            }
        }
        unique
    }
}

/// Run the full analysis; problems are reported in the result
#[instrument(skip_all, fields(chart = %request.chart, axis = %request.axis))]
pub fn analyze(table: &Table, request: &AnalysisRequest, config: &SpcConfig) -> AnalysisResult {
    match try_analyze(table, request, config) {
        Ok(result) => result,
        Err(error) => {
            debug!(kind = error.kind(), %error, "analysis blocked");
            AnalysisResult::failed(request, error)
        }
    }
}

/// Run the full analysis, stopping at the first blocking error
pub fn try_analyze(table: &Table, request: &AnalysisRequest, config: &SpcConfig) -> Result<AnalysisResult> {
    if table.columns().is_empty() || table.is_empty() {
        return Err(Error::NoData(NO_DATA_MESSAGE.to_string()));
    }

    let points = extract_points(
        table,
        request.date_column.as_deref(),
        &request.value_column,
        request.axis,
    )?;

    let minimum = match request.chart {
        ChartKind::Run => config.min_points,
        ChartKind::Xmr => config.min_points_xmr,
    };
    if points.len() < minimum {
        return Err(Error::insufficient(minimum, points.len()));
    }

    let labels: Vec<String> = points.iter().map(Point::axis_label).collect();
    let detector = AstronomicalDetector::new(config.astronomical_threshold);
    let target = request.target.filter(|t| t.is_finite());

    let mut result = AnalysisResult {
        chart: request.chart,
        labels,
        points,
        rules: request.rules,
        target: target.map(|value| TargetSetting {
            value,
            direction: request.direction,
        }),
        run: None,
        segments: Vec::new(),
        capability: CapabilityAssessment::NotApplicable,
        flags: RuleFlags::default(),
        highlights: Vec::new(),
        any_raw_lcl_below_zero: false,
        charts: Charts::default(),
        advisories: request.advisories.clone(),
        error: None,
    };

    match request.chart {
        ChartKind::Run => analyze_run(&mut result, request, config, &detector)?,
        ChartKind::Xmr => analyze_xmr(&mut result, request, config, &detector)?,
    }

    result.highlights = highlight_points(&result.flags, config.flag_special_causes);
    debug!(
        points = result.points.len(),
        periods = result.segments.len(),
        signals = result.signals().len(),
        "analysis complete"
    );
    Ok(result)
}

fn run_signals(shifts: usize, trends: usize, beyond: usize, astronomical: usize) -> Vec<Signal> {
    [
        (beyond, Signal::BeyondLimits),
        (shifts, Signal::SustainedShift),
        (trends, Signal::SustainedTrend),
        (astronomical, Signal::AstronomicalPoint),
    ]
    .into_iter()
    .filter_map(|(count, signal)| (count > 0).then_some(signal))
    .collect()
}

fn analyze_run(
    result: &mut AnalysisResult,
    request: &AnalysisRequest,
    config: &SpcConfig,
    detector: &AstronomicalDetector,
) -> Result<()> {
    let values = values_of(&result.points);
    let statistics = compute_run(&result.points, request.baseline_count)?;
    let baseline = &values[..statistics.baseline_count_used];
    let rules = request.rules;

    let shifts = find_long_run_ranges(&values, statistics.median, rules.shift_length);
    let trends = find_trend_ranges(&values, rules.trend_length);
    let astronomical = detector.detect(&values, statistics.median, Some(baseline));
    let signals = run_signals(shifts.len(), trends.len(), 0, astronomical.indices.len());

    let n = values.len();
    result.flags = RuleFlags {
        astronomical: astronomical.flags.clone(),
        beyond_limits: vec![false; n],
        shift: flags_from_ranges(n, &shifts),
        trend: flags_from_ranges(n, &trends),
    };

    result.charts.main = Some(run_chart_spec(
        &result.labels,
        &values,
        statistics.median,
        result.target.map(|t| t.value),
        &request.annotations,
        &config.captions,
    ));

    result.run = Some(RunAnalysis {
        statistics,
        shifts,
        trends,
        astronomical,
        signals,
        target_coverage: result
            .target
            .map(|t| target_coverage(&values, t.value, t.direction)),
    });
    Ok(())
}

fn analyze_segment(
    segment: Segment,
    request: &AnalysisRequest,
    detector: &AstronomicalDetector,
) -> (SegmentAnalysis, RuleFlags) {
    let stats = &segment.statistics;
    let values = stats.values();
    let n = values.len();
    let rules = request.rules;

    let beyond_limits = stats.beyond_limit_indices();
    let shifts = find_long_run_ranges(&values, stats.mean, rules.shift_length);
    let trends = find_trend_ranges(&values, rules.trend_length);

    let reference_len = if segment.baseline_count_used >= 3 {
        segment.baseline_count_used
    } else {
        n
    };
    let astronomical = detector.detect(&values, stats.mean, Some(&values[..reference_len.min(n)]));

    let signals = run_signals(
        shifts.len(),
        trends.len(),
        beyond_limits.len(),
        astronomical.indices.len(),
    );
    let target = request.target.filter(|t| t.is_finite());
    let capability =
        CapabilityAssessment::assess(stats.mean, stats.sigma, target, request.direction, &signals);
    let coverage = target.map(|t| target_coverage(&values, t, request.direction));

    let flags = RuleFlags {
        astronomical: astronomical.flags.clone(),
        beyond_limits: flags_from_indices(n, &beyond_limits),
        shift: flags_from_ranges(n, &shifts),
        trend: flags_from_ranges(n, &trends),
    };

    let offset = segment.start_index;
    let analysis = SegmentAnalysis {
        beyond_limits_global: beyond_limits.iter().map(|i| i + offset).collect(),
        astronomical_global: astronomical.indices.iter().map(|i| i + offset).collect(),
        beyond_limits,
        shifts,
        trends,
        astronomical,
        signals,
        capability,
        target_coverage: coverage,
        segment,
    };
    (analysis, flags)
}

fn analyze_xmr(
    result: &mut AnalysisResult,
    request: &AnalysisRequest,
    config: &SpcConfig,
    detector: &AstronomicalDetector,
) -> Result<()> {
    let segments = segment_points(
        &result.points,
        request.baseline_count,
        &request.splits,
        request.clamp_lcl,
    )?;

    result.any_raw_lcl_below_zero = segments.iter().any(|s| s.statistics.raw_lcl < 0.0);

    let mut flags = RuleFlags::new(result.points.len());
    for segment in &segments {
        let (analysis, local) = analyze_segment(segment.clone(), request, detector);
        flags.splice(analysis.segment.start_index, &local);
        result.segments.push(analysis);
    }
    result.flags = flags;

    result.charts.main = Some(xmr_chart_spec(
        &result.labels,
        &segments,
        result.target.map(|t| t.value),
        &request.annotations,
        &config.captions,
    ));

    if let Some(last) = result.segments.last() {
        result.capability = last.capability;
        if config.show_mr_chart {
            let seg = &last.segment;
            let labels = &result.labels[seg.start_index..=seg.end_index];
            result.charts.moving_range = mr_chart_spec(labels, &seg.statistics);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(values: &[f64]) -> Table {
        let records: Vec<Vec<String>> = values
            .iter()
            .enumerate()
            .map(|(i, v)| vec![format!("2024-01-{:02}", i + 1), v.to_string()])
            .collect();
        Table::from_records(vec!["Date".into(), "Value".into()], &records)
    }

    fn request(chart: ChartKind) -> AnalysisRequestBuilder {
        AnalysisRequest::builder("Value").date_column("Date").chart(chart)
    }

    #[test]
    fn test_builder_defaults() {
        let r = AnalysisRequest::builder("Value").build();
        assert_eq!(r.chart, ChartKind::Run);
        assert_eq!(r.axis, AxisType::Date);
        assert_eq!(r.rules, RuleSettings::default());
        assert!(r.target.is_none());
        assert!(AnalysisRequest::builder("v").target(f64::NAN).build().target.is_none());
    }

    #[test]
    fn test_run_chart_signals() {
        let values = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 9.0];
        let result = analyze(&table(&values), &request(ChartKind::Run).build(), &SpcConfig::default());
        assert!(result.is_ok());
        let run = result.run.as_ref().unwrap();
        assert_eq!(run.statistics.median, 1.0);
        // Everything sits on or above the median of 1
        assert!(run.shifts.is_empty());
        assert_eq!(result.labels[0], "2024-01-01");
        assert_eq!(result.capability, CapabilityAssessment::NotApplicable);
    }

    #[test]
    fn test_xmr_needs_twelve_points() {
        let result = analyze(
            &table(&[1.0, 2.0, 3.0, 4.0, 5.0]),
            &request(ChartKind::Xmr).build(),
            &SpcConfig::default(),
        );
        assert_eq!(result.error, Some(Error::insufficient(12, 5)));
        assert!(result.segments.is_empty());
        assert!(result.charts.main.is_none());
    }

    #[test]
    fn test_signals_withhold_capability() {
        let mut values: Vec<f64> = (0..14).map(|i| 10.0 + (i % 3) as f64).collect();
        values.push(40.0);
        let result = analyze(
            &table(&values),
            &request(ChartKind::Xmr).target(9.0).build(),
            &SpcConfig::default(),
        );
        let last = result.segments.last().unwrap();
        assert!(last.signals.contains(&Signal::BeyondLimits));
        assert_eq!(last.beyond_limits_global, vec![14]);
        assert_eq!(result.capability, CapabilityAssessment::Unstable);
        assert_eq!(result.highlights[14], PointHighlight::Outlier);
    }

    #[test]
    fn test_stable_period_reports_capability() {
        let values: Vec<f64> = (0..15).map(|i| 10.0 + (i % 3) as f64).collect();
        let result = analyze(
            &table(&values),
            &request(ChartKind::Xmr).target(9.0).build(),
            &SpcConfig::default(),
        );
        assert!(result.segments[0].is_stable());
        let estimate = result.capability.estimate().unwrap();
        assert!(estimate.probability > 0.5);
        assert!(result.charts.moving_range.is_some());
    }

    #[test]
    fn test_no_data() {
        let empty = Table::new(vec!["Date".into(), "Value".into()], vec![]);
        let result = analyze(&empty, &request(ChartKind::Run).build(), &SpcConfig::default());
        assert!(matches!(result.error, Some(Error::NoData(_))));
    }
}
