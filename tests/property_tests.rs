//! Property-based tests for the full analysis

use proptest::prelude::*;
use spc_charts::{analyze, AnalysisRequest, AxisType, ChartKind, SpcConfig, Table};

fn table(values: &[f64]) -> Table {
    let records: Vec<Vec<String>> = values.iter().map(|v| vec![v.to_string()]).collect();
    Table::from_records(vec!["Value".to_string()], &records)
}

fn request(chart: ChartKind, splits: Vec<usize>, target: Option<f64>) -> AnalysisRequest {
    let mut builder = AnalysisRequest::builder("Value")
        .axis(AxisType::Sequence)
        .chart(chart)
        .splits(splits);
    if let Some(t) = target {
        builder = builder.target(t);
    }
    builder.build()
}

fn chart_strategy() -> impl Strategy<Value = ChartKind> {
    prop_oneof![Just(ChartKind::Run), Just(ChartKind::Xmr)]
}

proptest! {
    // Property: the same input always yields the same result
    #[test]
    fn prop_analysis_is_idempotent(
        values in prop::collection::vec(-1.0e3..1.0e3f64, 12..60),
        chart in chart_strategy(),
        splits in prop::collection::vec(0usize..60, 0..4),
        target in prop::option::of(-1.0e3..1.0e3f64)
    ) {
        let table = table(&values);
        let request = request(chart, splits, target);
        let config = SpcConfig::default();
        prop_assert_eq!(analyze(&table, &request, &config), analyze(&table, &request, &config));
    }

    // Property: one highlight and one label per point, and periods cover every point
    #[test]
    fn prop_outputs_align_with_points(
        values in prop::collection::vec(0.0..100.0f64, 12..60),
        splits in prop::collection::vec(0usize..60, 0..4)
    ) {
        let result = analyze(&table(&values), &request(ChartKind::Xmr, splits, None), &SpcConfig::default());
        prop_assert!(result.is_ok());
        let n = values.len();
        prop_assert_eq!(result.points.len(), n);
        prop_assert_eq!(result.labels.len(), n);
        prop_assert_eq!(result.highlights.len(), n);
        prop_assert_eq!(result.flags.len(), n);
        let covered: usize = result.segments.iter().map(|s| s.segment.len()).sum();
        prop_assert_eq!(covered, n);
    }

    // Property: a withheld or reported capability only comes with a target
    #[test]
    fn prop_capability_needs_target(values in prop::collection::vec(0.0..100.0f64, 12..40)) {
        let result = analyze(&table(&values), &request(ChartKind::Xmr, vec![], None), &SpcConfig::default());
        prop_assert_eq!(result.capability, spc_charts::CapabilityAssessment::NotApplicable);
    }
}
