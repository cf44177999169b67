//! Chart specifications and the renderer interface
//!
//! Analysis produces a [`ChartSpec`]: x labels, named series with gaps as
//! `None`, and vertical markers. Drawing is left to a [`ChartRenderer`];
//! nothing a renderer does flows back into the analysis.

use crate::segment::Segment;
use crate::xmr::XmrStatistics;
use serde::{Deserialize, Serialize};
use spc_core::Result;

/// How a series should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStyle {
    /// Observed values, drawn with points
    Data,
    /// Median, mean or average moving range
    CentreLine,
    /// Control limits
    ControlLimit,
    /// ±1σ and ±2σ guides
    SigmaReference,
    Target,
}

/// A named sequence of values aligned with the chart labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<f64>>,
    pub style: SeriesStyle,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>, style: SeriesStyle) -> Self {
        Self {
            name: name.into(),
            values,
            style,
        }
    }

    /// A horizontal line of `n` copies of `value`
    pub fn constant(name: impl Into<String>, value: f64, n: usize, style: SeriesStyle) -> Self {
        Self::new(name, vec![Some(value); n], style)
    }
}

/// A user note tied to an x label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// ISO date (or sequence label) the note belongs to
    pub date: String,
    pub label: String,
}

impl Annotation {
    pub fn new(date: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            label: label.into(),
        }
    }
}

/// A vertical line drawn at one x label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerticalMarker {
    /// Position of the marker among the chart labels
    pub index: usize,
    pub at: String,
    pub text: String,
}

/// Title and axis captions, each falling back to a chart-specific default
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLabels {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
}

impl ChartLabels {
    fn pick(value: &Option<String>, default: &str) -> String {
        value
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(default)
            .to_string()
    }

    fn resolve(&self, default_title: &str) -> (String, String, String) {
        (
            Self::pick(&self.title, default_title),
            Self::pick(&self.x_label, "Date"),
            Self::pick(&self.y_label, "Value"),
        )
    }
}

/// Everything a renderer needs to draw one chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    pub markers: Vec<VerticalMarker>,
}

impl ChartSpec {
    /// Look up a series by name
    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }
}

/// Draws charts described by a [`ChartSpec`]
pub trait ChartRenderer {
    /// Draw (or redraw) a chart
    fn draw(&mut self, spec: &ChartSpec) -> Result<()>;

    /// Release whatever the last `draw` created
    fn destroy(&mut self);

    /// Check if this renderer produces any output
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Renderer that draws nothing
#[derive(Default, Clone, Copy, Debug)]
pub struct NullChartRenderer;

impl ChartRenderer for NullChartRenderer {
    #[inline(always)]
    fn draw(&mut self, _: &ChartSpec) -> Result<()> {
        Ok(())
    }

    #[inline(always)]
    fn destroy(&mut self) {}

    #[inline(always)]
    fn is_enabled(&self) -> bool {
        false
    }
}

/// Markers for annotations whose date matches a label; others are skipped
pub fn markers_for(labels: &[String], annotations: &[Annotation]) -> Vec<VerticalMarker> {
    annotations
        .iter()
        .filter_map(|a| {
            let index = labels.iter().position(|l| *l == a.date)?;
            Some(VerticalMarker {
                index,
                at: a.date.clone(),
                text: a.label.clone(),
            })
        })
        .collect()
}

fn observed(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

/// Run chart: values, median line and an optional target line
pub fn run_chart_spec(
    labels: &[String],
    values: &[f64],
    median: f64,
    target: Option<f64>,
    annotations: &[Annotation],
    captions: &ChartLabels,
) -> ChartSpec {
    let n = values.len();
    let mut series = vec![
        Series::new("Value", observed(values), SeriesStyle::Data),
        Series::constant("Median", median, n, SeriesStyle::CentreLine),
    ];
    if let Some(t) = target {
        series.push(Series::constant("Target", t, n, SeriesStyle::Target));
    }

    let (title, x_label, y_label) = captions.resolve("Run Chart");
    ChartSpec {
        title,
        x_label,
        y_label,
        labels: labels.to_vec(),
        series,
        markers: markers_for(labels, annotations),
    }
}

/// Individuals chart with piecewise per-period centre line and limits
///
/// Sigma guides appear only when some period has variation; periods with
/// zero sigma leave gaps in them.
pub fn xmr_chart_spec(
    labels: &[String],
    segments: &[Segment],
    target: Option<f64>,
    annotations: &[Annotation],
    captions: &ChartLabels,
) -> ChartSpec {
    let n: usize = segments.iter().map(Segment::len).sum();
    let mut values = Vec::with_capacity(n);
    let mut mean = Vec::with_capacity(n);
    let mut ucl = Vec::with_capacity(n);
    let mut lcl = Vec::with_capacity(n);
    let mut guides: [Vec<Option<f64>>; 4] = Default::default();
    let mut any_sigma = false;

    for segment in segments {
        let s = &segment.statistics;
        let spread = (s.sigma > 0.0).then_some(s.sigma);
        any_sigma |= spread.is_some();
        for p in &s.points {
            values.push(Some(p.point.y));
            mean.push(Some(s.mean));
            ucl.push(Some(s.ucl));
            lcl.push(Some(s.lcl));
            for (guide, k) in guides.iter_mut().zip([1.0, -1.0, 2.0, -2.0]) {
                guide.push(spread.map(|sigma| s.mean + k * sigma));
            }
        }
    }

    let mut series = vec![
        Series::new("Value", values, SeriesStyle::Data),
        Series::new("Mean", mean, SeriesStyle::CentreLine),
        Series::new("UCL (3σ)", ucl, SeriesStyle::ControlLimit),
        Series::new("LCL (3σ)", lcl, SeriesStyle::ControlLimit),
    ];
    if any_sigma {
        let [up1, down1, up2, down2] = guides;
        for (name, guide) in [("+1σ", up1), ("-1σ", down1), ("+2σ", up2), ("-2σ", down2)] {
            series.push(Series::new(name, guide, SeriesStyle::SigmaReference));
        }
    }
    if let Some(t) = target {
        series.push(Series::constant("Target", t, n, SeriesStyle::Target));
    }

    let (title, x_label, y_label) = captions.resolve("I-MR Chart");
    ChartSpec {
        title,
        x_label,
        y_label,
        labels: labels.to_vec(),
        series,
        markers: markers_for(labels, annotations),
    }
}

/// Moving-range chart of one period
///
/// `labels` are the period's x labels; moving ranges are drawn from the
/// second label on. Returns `None` when the period has a single point.
pub fn mr_chart_spec(labels: &[String], statistics: &XmrStatistics) -> Option<ChartSpec> {
    let ranges = &statistics.moving_ranges;
    if ranges.is_empty() {
        return None;
    }
    let n = ranges.len();
    let limits = statistics.mr_limits();
    Some(ChartSpec {
        title: "Moving Range (MR) Chart".to_string(),
        x_label: "Date".to_string(),
        y_label: "Moving range".to_string(),
        labels: labels.iter().skip(1).take(n).cloned().collect(),
        series: vec![
            Series::new("Moving range", observed(ranges), SeriesStyle::Data),
            Series::constant("Average MR", limits.centre, n, SeriesStyle::CentreLine),
            Series::constant("UCL (MR)", limits.ucl, n, SeriesStyle::ControlLimit),
            Series::constant("LCL (MR)", limits.lcl, n, SeriesStyle::ControlLimit),
        ],
        markers: Vec::new(),
    })
}
