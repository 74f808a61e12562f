//! `Analyzer` — bridges `SimObserver` samples into a `TimeSeries`.

use swarm_core::{Preset, Tick};
use swarm_sim::{SimObserver, WorldView};
use tracing::debug;

use crate::{AnalysisError, AnalysisResult, Metric, SeriesCsvWriter, TimeSeries};

/// One recorded point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    pub step:    u64,
    pub trial:   u32,
    pub value:   f64,
    pub average: f64,
}

/// A [`SimObserver`] that evaluates a [`Metric`] at every sample point.
///
/// Only numbers are kept; nothing from the world outlives the callback, so
/// the series survives resets untouched.  With a CSV writer attached, write
/// errors are stored and returned by [`take_error`][Self::take_error].
pub struct Analyzer {
    metric:     Metric,
    series:     TimeSeries,
    last:       Option<Sample>,
    writer:     Option<SeriesCsvWriter>,
    last_error: Option<AnalysisError>,
}

impl Analyzer {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            series:     TimeSeries::new(),
            last:       None,
            writer:     None,
            last_error: None,
        }
    }

    pub fn for_preset(preset: Preset) -> Self {
        Self::new(Metric::for_preset(preset))
    }

    /// Also stream every sample to `writer`.
    pub fn with_writer(mut self, writer: SeriesCsvWriter) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub fn last_sample(&self) -> Option<Sample> {
        self.last
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<AnalysisError> {
        self.last_error.take()
    }

    pub fn into_series(self) -> TimeSeries {
        self.series
    }

    fn store_err(&mut self, result: AnalysisResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl SimObserver for Analyzer {
    fn on_sample(&mut self, view: &WorldView<'_>) {
        let value = self.metric.evaluate(view);
        let step = view.step.0;
        let average = self.series.record(view.trial, step, value);
        let sample = Sample { step, trial: view.trial, value, average };
        self.last = Some(sample);
        debug!(step, trial = view.trial, value, average, metric = %self.metric, "sample");

        if let Some(writer) = self.writer.as_mut() {
            let result = writer.write_sample(step, view.trial, value, average);
            self.store_err(result);
        }
    }

    fn on_reset(&mut self, trial: u32) {
        self.series.start_trial(trial);
    }

    fn on_sim_end(&mut self, _final_step: Tick) {
        if let Some(writer) = self.writer.as_mut() {
            let result = writer.finish();
            self.store_err(result);
        }
    }
}
