//! Step-keyed time series kept across trials.

use std::collections::BTreeMap;

/// Per-step values from every trial, plus one series per trial.
///
/// Keys are step numbers rather than wall-clock time so repeated trials line
/// up exactly.
#[derive(Clone, Debug, Default)]
pub struct TimeSeries {
    by_step: BTreeMap<u64, Vec<f64>>,
    trials:  Vec<Vec<(u64, f64)>>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` for `trial` at `step`; returns the average over every
    /// trial recorded at this step so far.
    pub fn record(&mut self, trial: u32, step: u64, value: f64) -> f64 {
        let values = self.by_step.entry(step).or_default();
        values.push(value);
        let average = values.iter().sum::<f64>() / values.len() as f64;

        let t = trial as usize;
        if self.trials.len() <= t {
            self.trials.resize_with(t + 1, Vec::new);
        }
        self.trials[t].push((step, value));
        average
    }

    /// Open an empty series for `trial` even if it never records anything.
    pub fn start_trial(&mut self, trial: u32) {
        let t = trial as usize;
        if self.trials.len() <= t {
            self.trials.resize_with(t + 1, Vec::new);
        }
    }

    /// Raw values recorded at `step`, one per visit, in trial order.
    pub fn values(&self, step: u64) -> &[f64] {
        self.by_step.get(&step).map_or(&[], Vec::as_slice)
    }

    pub fn average(&self, step: u64) -> Option<f64> {
        let v = self.by_step.get(&step)?;
        Some(v.iter().sum::<f64>() / v.len() as f64)
    }

    /// `(step, average)` for every recorded step, ascending.
    pub fn averages(&self) -> Vec<(u64, f64)> {
        self.by_step
            .iter()
            .map(|(&step, v)| (step, v.iter().sum::<f64>() / v.len() as f64))
            .collect()
    }

    /// `(step, value)` pairs of one trial, in recording order.
    pub fn trial(&self, trial: u32) -> &[(u64, f64)] {
        self.trials.get(trial as usize).map_or(&[], Vec::as_slice)
    }

    pub fn trial_count(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_step.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_step.clear();
        self.trials.clear();
    }
}
