//! Interactive session state
//!
//! A [`SessionState`] owns the loaded table, the user's splits and
//! annotations, the last successful analysis and the renderer drawing it.
//! A failed run never disturbs the previous result. Bursts of edits go
//! through [`SessionState::schedule`] and run once the input is quiet.

use crate::analysis::{try_analyze, AnalysisRequest, AnalysisResult, NO_DATA_MESSAGE};
use crate::config::SpcConfig;
use crate::debounce::Debouncer;
use spc_chart::{Annotation, ChartRenderer, NullChartRenderer};
use spc_core::{Error, Result, Table};
use spc_parse::{infer_columns, load_csv, ColumnGuess};
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// State behind one chart view
#[derive(Debug)]
pub struct SessionState<R: ChartRenderer = NullChartRenderer> {
    config: SpcConfig,
    table: Option<Table>,
    splits: BTreeSet<usize>,
    annotations: Vec<Annotation>,
    last: Option<AnalysisResult>,
    renderer: R,
    generation: u64,
    pending: Debouncer<AnalysisRequest>,
}

impl SessionState<NullChartRenderer> {
    /// Session that computes results without drawing
    pub fn new(config: SpcConfig) -> Self {
        Self::with_renderer(config, NullChartRenderer)
    }
}

impl Default for SessionState<NullChartRenderer> {
    fn default() -> Self {
        Self::new(SpcConfig::default())
    }
}

impl<R: ChartRenderer> SessionState<R> {
    pub fn with_renderer(config: SpcConfig, renderer: R) -> Self {
        Self {
            pending: Debouncer::new(config.debounce_window()),
            config,
            table: None,
            splits: BTreeSet::new(),
            annotations: Vec::new(),
            last: None,
            renderer,
            generation: 0,
        }
    }

    /// Replace the data; splits and annotations belong to the old data and are cleared
    pub fn load(&mut self, table: Table) -> ColumnGuess {
        let guess = infer_columns(&table);
        debug!(rows = table.len(), columns = table.columns().len(), "loaded table");
        self.table = Some(table);
        self.splits.clear();
        self.annotations.clear();
        guess
    }

    /// Parse delimited text and load it
    pub fn load_text(&mut self, text: &str) -> Result<ColumnGuess> {
        let loaded = load_csv(text)?;
        Ok(self.load(loaded.table))
    }

    /// Run an analysis with the session's splits and annotations
    ///
    /// On success the previous chart is destroyed, the new one drawn and
    /// the result stored. A failed analysis leaves the previous result and
    /// chart in place. A renderer error is logged and does not undo a
    /// successful analysis.
    #[instrument(skip_all, fields(generation = self.generation))]
    pub fn generate(&mut self, request: &AnalysisRequest) -> Result<&AnalysisResult> {
        let table = self
            .table
            .as_ref()
            .ok_or_else(|| Error::NoData(NO_DATA_MESSAGE.to_string()))?;

        let mut effective = request.clone();
        effective.splits.extend(self.splits.iter().copied());
        effective.annotations.extend(self.annotations.iter().cloned());

        let result = try_analyze(table, &effective, &self.config)?;

        if self.renderer.is_enabled() {
            self.renderer.destroy();
            for spec in [&result.charts.main, &result.charts.moving_range].into_iter().flatten() {
                if let Err(e) = self.renderer.draw(spec) {
                    warn!(title = %spec.title, error = %e, "chart could not be drawn");
                }
            }
        }
        self.generation += 1;
        debug!(generation = self.generation, "analysis replaced");
        Ok(self.last.insert(result))
    }

    /// Queue `request` to run once no newer request arrives for the debounce window
    pub fn schedule(&mut self, request: AnalysisRequest, now: Instant) {
        self.pending.submit(request, now);
    }

    /// Run the scheduled request if its window has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<Result<&AnalysisResult>> {
        let request = self.pending.poll(now)?;
        Some(self.generate(&request))
    }

    /// When the scheduled request becomes due
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.deadline()
    }

    /// Clear data, splits, annotations, any scheduled request, the last result and the chart
    pub fn reset(&mut self) {
        self.pending.cancel();
        self.table = None;
        self.splits.clear();
        self.annotations.clear();
        self.last = None;
        self.renderer.destroy();
    }

    /// Start a new period after point `index` of the last result
    ///
    /// Returns `false` when the split already exists.
    pub fn add_split_after(&mut self, index: usize) -> Result<bool> {
        let n = self.last.as_ref().map_or(0, |r| r.points.len());
        if n == 0 {
            return Err(Error::NoData(
                "Generate a chart before adding splits.".to_string(),
            ));
        }
        if index >= n - 1 {
            return Err(Error::InvalidParameter(format!(
                "cannot split after point {} of {n}: the last point cannot start a new period",
                index.saturating_add(1)
            )));
        }
        Ok(self.splits.insert(index))
    }

    pub fn remove_split(&mut self, index: usize) -> bool {
        self.splits.remove(&index)
    }

    pub fn clear_splits(&mut self) {
        self.splits.clear();
    }

    /// Split indices in ascending order
    pub fn splits(&self) -> Vec<usize> {
        self.splits.iter().copied().collect()
    }

    pub fn add_annotation(&mut self, date: impl Into<String>, label: impl Into<String>) {
        self.annotations.push(Annotation::new(date, label));
    }

    pub fn clear_annotations(&mut self) {
        self.annotations.clear();
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn last(&self) -> Option<&AnalysisResult> {
        self.last.as_ref()
    }

    /// Number of successful analyses so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &SpcConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spc_chart::ChartSpec;
    use spc_core::ChartKind;

    #[derive(Default)]
    struct RecordingRenderer {
        drawn: Vec<String>,
        destroyed: usize,
    }

    impl ChartRenderer for RecordingRenderer {
        fn draw(&mut self, spec: &ChartSpec) -> Result<()> {
            self.drawn.push(spec.title.clone());
            Ok(())
        }

        fn destroy(&mut self) {
            self.destroyed += 1;
            self.drawn.clear();
        }
    }

    /// Draws until `fail` is set, then rejects every draw
    #[derive(Default)]
    struct FlakyRenderer {
        fail: bool,
        on_screen: usize,
    }

    impl ChartRenderer for FlakyRenderer {
        fn draw(&mut self, _: &ChartSpec) -> Result<()> {
            if self.fail {
                return Err(Error::InvalidParameter("canvas unavailable".to_string()));
            }
            self.on_screen += 1;
            Ok(())
        }

        fn destroy(&mut self) {
            self.on_screen = 0;
        }
    }

    fn csv(n: usize) -> String {
        let mut text = String::from("Date,Value\n");
        for i in 0..n {
            text.push_str(&format!("2024-01-{:02},{}\n", i + 1, 10 + i % 3));
        }
        text
    }

    fn xmr() -> AnalysisRequest {
        AnalysisRequest::builder("Value")
            .date_column("Date")
            .chart(ChartKind::Xmr)
            .build()
    }

    #[test]
    fn test_generate_draws_and_replaces() {
        let mut session = SessionState::with_renderer(SpcConfig::default(), RecordingRenderer::default());
        let guess = session.load_text(&csv(15)).unwrap();
        assert_eq!(guess.date_column.as_deref(), Some("Date"));

        session.generate(&xmr()).unwrap();
        assert_eq!(session.renderer().drawn, vec!["I-MR Chart", "Moving Range (MR) Chart"]);
        session.generate(&xmr()).unwrap();
        assert_eq!(session.renderer().destroyed, 2);
        assert_eq!(session.renderer().drawn.len(), 2);
        assert_eq!(session.generation(), 2);
    }

    #[test]
    fn test_failure_keeps_previous_result() {
        let mut session = SessionState::default();
        session.load_text(&csv(15)).unwrap();
        session.generate(&xmr()).unwrap();

        let bad = AnalysisRequest::builder("Missing").date_column("Date").build();
        assert!(matches!(session.generate(&bad), Err(Error::UnknownColumn(_))));
        assert_eq!(session.last().map(|r| r.points.len()), Some(15));
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn test_draw_failure_still_replaces_result() {
        let mut session = SessionState::with_renderer(SpcConfig::default(), FlakyRenderer::default());
        session.load_text(&csv(30)).unwrap();
        session.generate(&xmr()).unwrap();
        assert_eq!(session.renderer().on_screen, 2);

        session.add_split_after(14).unwrap();
        session.renderer.fail = true;
        let result = session.generate(&xmr()).unwrap();
        assert_eq!(result.segments.len(), 2);
        assert_eq!(session.last().map(|r| r.segments.len()), Some(2));
        assert_eq!(session.generation(), 2);
        assert_eq!(session.renderer().on_screen, 0);
    }

    #[test]
    fn test_scheduled_requests_coalesce() {
        let start = Instant::now();
        let window = SpcConfig::default().debounce_window();
        let mut session = SessionState::default();
        session.load_text(&csv(15)).unwrap();

        session.schedule(xmr(), start);
        let run = AnalysisRequest::builder("Value").date_column("Date").build();
        session.schedule(run, start + window / 2);
        assert!(session.poll(start + window).is_none());
        assert_eq!(session.deadline(), Some(start + window / 2 + window));

        let result = session.poll(start + window * 2).unwrap().unwrap();
        assert_eq!(result.chart, ChartKind::Run);
        assert_eq!(session.generation(), 1);
        assert!(session.poll(start + window * 3).is_none());
        assert!(session.deadline().is_none());
    }

    #[test]
    fn test_splits() {
        let mut session = SessionState::default();
        assert!(matches!(session.add_split_after(3), Err(Error::NoData(_))));

        session.load_text(&csv(30)).unwrap();
        session.generate(&xmr()).unwrap();
        assert!(session.add_split_after(14).unwrap());
        assert!(!session.add_split_after(14).unwrap());
        assert!(matches!(session.add_split_after(29), Err(Error::InvalidParameter(_))));
        assert!(matches!(
            session.add_split_after(usize::MAX),
            Err(Error::InvalidParameter(_))
        ));

        let result = session.generate(&xmr()).unwrap();
        assert_eq!(result.segments.len(), 2);
        assert_eq!(result.segments[1].segment.start_index, 15);

        assert!(session.remove_split(14));
        assert!(session.splits().is_empty());
    }

    #[test]
    fn test_load_clears_splits_and_annotations() {
        let mut session = SessionState::default();
        session.load_text(&csv(20)).unwrap();
        session.generate(&xmr()).unwrap();
        session.add_split_after(5).unwrap();
        session.add_annotation("2024-01-03", "New protocol");

        session.load_text(&csv(20)).unwrap();
        assert!(session.splits().is_empty());
        assert!(session.annotations().is_empty());

        session.reset();
        assert!(session.table().is_none());
        assert!(session.last().is_none());
        assert!(matches!(session.generate(&xmr()), Err(Error::NoData(_))));
    }
}
