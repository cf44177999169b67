//! Plain-text summaries of an analysis

use crate::analysis::{AnalysisResult, CapabilityAssessment, RunAnalysis, SegmentAnalysis, TargetSetting};
use spc_chart::TargetCoverage;
use spc_core::{ChartKind, Direction};
use std::fmt::{self, Write};

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn joined<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Up to three one-based positions, with an ellipsis when there are more
fn first_points(indices: &[usize]) -> String {
    let mut text = indices
        .iter()
        .take(3)
        .map(|i| (i + 1).to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if indices.len() > 3 {
        text.push_str(", ...");
    }
    format!("point{} {text}", plural(indices.len()))
}

fn direction_hint(direction: Direction) -> &'static str {
    match direction {
        Direction::Above => "at or above is better",
        Direction::Below => "at or below is better",
    }
}

fn coverage_text(coverage: &TargetCoverage, scope: &str) -> String {
    format!(
        "{:.1}% of points in {scope} meet the target ({}/{}).",
        coverage.proportion * 100.0,
        coverage.hits,
        coverage.total
    )
}

fn write_target(
    f: &mut fmt::Formatter<'_>,
    target: &TargetSetting,
    coverage: Option<&TargetCoverage>,
    scope: &str,
) -> fmt::Result {
    write!(f, "- Target: {} ({}). ", target.value, direction_hint(target.direction))?;
    match coverage {
        Some(c) if c.total > 0 => writeln!(f, "{}", coverage_text(c, scope)),
        _ => writeln!(f, "Target coverage not calculated for {scope}."),
    }
}

impl AnalysisResult {
    fn fmt_run(&self, f: &mut fmt::Formatter<'_>, run: &RunAnalysis) -> fmt::Result {
        let n = self.points.len();
        let stats = &run.statistics;
        writeln!(f, "Summary (Run chart)")?;
        writeln!(f, "- Number of points: {n}")?;
        if stats.baseline_count_used < n {
            writeln!(
                f,
                "- Baseline: first {} points used to calculate median.",
                stats.baseline_count_used
            )?;
        } else {
            writeln!(f, "- Baseline: all points used to calculate median.")?;
        }
        writeln!(f, "- Median: {:.3}", stats.median)?;
        if let Some(target) = &self.target {
            write_target(f, target, run.target_coverage.as_ref(), "the series")?;
        }

        writeln!(f)?;
        writeln!(f, "Rules identified")?;
        let shift = self.rules.shift_length;
        if run.shifts.is_empty() {
            writeln!(f, "- Rule 1 - Shift: No (>={shift} on one side).")?;
        } else {
            writeln!(f, "- Rule 1 - Shift: YES (>={shift} on one side). {}.", joined(&run.shifts))?;
        }
        let trend = self.rules.trend_length;
        if run.trends.is_empty() {
            writeln!(f, "- Rule 2 - Trend: No (>={trend} consecutive moves).")?;
        } else {
            writeln!(
                f,
                "- Rule 2 - Trend: YES (>={trend} consecutive moves). {}.",
                joined(&run.trends)
            )?;
        }
        if run.astronomical.has_outliers() {
            let points: Vec<String> = run
                .astronomical
                .indices
                .iter()
                .map(|i| format!("point {}", i + 1))
                .collect();
            writeln!(f, "- Rule 3 - Astronomical point: YES ({}).", points.join(", "))?;
        } else {
            writeln!(f, "- Rule 3 - Astronomical point: No.")?;
        }

        writeln!(f)?;
        if run.signals.is_empty() {
            write!(
                f,
                "Interpretation: No rule breaches detected from shift/trend/astronomical rules. \
                 Variation looks consistent with common-cause only (interpret in context)."
            )
        } else {
            write!(
                f,
                "Interpretation: Special-cause signals are present. See the labelled rules above \
                 and consider what changed at those times."
            )
        }
    }

    fn period_heading(&self, index: usize) -> String {
        match (self.segments.len(), index) {
            (1, _) => "Single period".to_string(),
            (_, 0) => "Period 1 (initial segment / baseline)".to_string(),
            (_, i) => format!("Period {}", i + 1),
        }
    }

    fn fmt_period(&self, f: &mut fmt::Formatter<'_>, index: usize, period: &SegmentAnalysis) -> fmt::Result {
        let segment = &period.segment;
        let stats = &segment.statistics;
        let n = segment.len();

        writeln!(f)?;
        writeln!(f, "{}", self.period_heading(index))?;
        let mut range = format!("points {}-{}", segment.start_index + 1, segment.end_index + 1);
        if let (Some(first), Some(last)) = (
            self.labels.get(segment.start_index),
            self.labels.get(segment.end_index),
        ) {
            // Writing to a String cannot fail
            let _ = write!(range, " ({first} to {last})");
        }
        writeln!(f, "- Coverage: {range} - {n} point{}.", plural(n))?;

        if segment.baseline_count_used < n {
            writeln!(
                f,
                "- Baseline for this period: first {} point{} used to calculate mean and limits.",
                segment.baseline_count_used,
                plural(segment.baseline_count_used)
            )?;
        } else {
            writeln!(
                f,
                "- Baseline for this period: all points in this period used to calculate mean and limits."
            )?;
        }
        writeln!(
            f,
            "- Mean: {:.3}; control limits: LCL = {:.3}, UCL = {:.3}.",
            stats.mean, stats.lcl, stats.ucl
        )?;
        writeln!(
            f,
            "- Estimated sigma (from MR): {:.3} (average MR = {:.3}).",
            stats.sigma, stats.avg_moving_range
        )?;
        if let Some(target) = &self.target {
            write_target(f, target, period.target_coverage.as_ref(), "this period")?;
        }

        if period.is_stable() {
            writeln!(
                f,
                "- Interpretation: No clear special-cause signals were detected in this period. \
                 The pattern is consistent with natural/common variation (still interpret in context)."
            )?;
        } else {
            writeln!(
                f,
                "- Interpretation: This period shows special-cause signals: {}.",
                joined(&period.signals)
            )?;
            let mut hints = Vec::new();
            if !period.beyond_limits_global.is_empty() {
                hints.push(format!("outside limits at {}", first_points(&period.beyond_limits_global)));
            }
            if !period.astronomical_global.is_empty() {
                hints.push(format!("outlier at {}", first_points(&period.astronomical_global)));
            }
            if !hints.is_empty() {
                writeln!(f, "- Where to look: {}.", hints.join("; "))?;
            }
        }

        match &period.capability {
            CapabilityAssessment::Estimated(c) => writeln!(
                f,
                "- Estimated capability (this period): if the process remains stable, about {:.1}% \
                 of future points are expected to meet the target.",
                c.probability * 100.0
            ),
            CapabilityAssessment::Unstable => writeln!(
                f,
                "- Capability: a target has been set, but because special-cause signals are present \
                 in this period, any capability estimate would be unreliable."
            ),
            CapabilityAssessment::NotApplicable => Ok(()),
        }
    }

    fn fmt_xmr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let periods = self.segments.len();
        writeln!(f, "Summary (XmR chart)")?;
        writeln!(
            f,
            "Total number of points: {}. The chart is divided into {periods} period{} \
             (based on the baseline and any splits).",
            self.points.len(),
            plural(periods)
        )?;
        for (index, period) in self.segments.iter().enumerate() {
            self.fmt_period(f, index, period)?;
        }
        if self.target.is_some() && periods > 1 {
            writeln!(f)?;
            writeln!(
                f,
                "Note: comparing means, limits and target performance between periods can \
                 indicate whether the process changed after interventions."
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.error {
            return write!(f, "{error}");
        }
        match (self.chart, &self.run) {
            (ChartKind::Run, Some(run)) => self.fmt_run(f, run),
            (ChartKind::Xmr, _) => self.fmt_xmr(f),
            (ChartKind::Run, None) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::analysis::{analyze, AnalysisRequest};
    use crate::config::SpcConfig;
    use spc_core::{AxisType, ChartKind, Table};

    fn table(values: &[f64]) -> Table {
        let records: Vec<Vec<String>> = values.iter().map(|v| vec![v.to_string()]).collect();
        Table::from_records(vec!["Value".into()], &records)
    }

    fn request(chart: ChartKind) -> AnalysisRequest {
        AnalysisRequest::builder("Value")
            .axis(AxisType::Sequence)
            .chart(chart)
            .target(10.0)
            .build()
    }

    #[test]
    fn test_run_summary() {
        let values = [5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 4.0];
        let text = analyze(&table(&values), &request(ChartKind::Run), &SpcConfig::default()).to_string();
        assert!(text.starts_with("Summary (Run chart)"));
        assert!(text.contains("- Number of points: 8"));
        assert!(text.contains("- Median: 7.500"));
        assert!(text.contains("Rule 2 - Trend: YES (>=6 consecutive moves). points 1-6"));
        assert!(text.contains("Special-cause signals are present"));
        assert!(text.contains("25.0% of points in the series meet the target (2/8)."));
    }

    #[test]
    fn test_xmr_summary_periods() {
        let values: Vec<f64> = (0..24).map(|i| 10.0 + (i % 3) as f64).collect();
        let request = AnalysisRequest {
            splits: vec![11],
            ..request(ChartKind::Xmr)
        };
        let text = analyze(&table(&values), &request, &SpcConfig::default()).to_string();
        assert!(text.contains("divided into 2 periods"));
        assert!(text.contains("Period 1 (initial segment / baseline)"));
        assert!(text.contains("- Coverage: points 13-24 (Point 13 to Point 24) - 12 points."));
        assert!(text.contains("Estimated capability (this period)"));
        assert!(text.contains("Note: comparing means"));
    }

    #[test]
    fn test_error_summary() {
        let text = analyze(&table(&[1.0, 2.0, 3.0]), &request(ChartKind::Xmr), &SpcConfig::default())
            .to_string();
        assert_eq!(text, "Insufficient data: expected at least 12 valid points, got 3");
    }
}
