//! CSV output for analysis samples.
//!
//! One file, header `step,trial,value,average`, one row per sample.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{AnalysisResult, TimeSeries};

pub struct SeriesCsvWriter {
    out:      Writer<File>,
    finished: bool,
}

impl SeriesCsvWriter {
    /// Create (or truncate) `path` and write the header row.
    pub fn new(path: &Path) -> AnalysisResult<Self> {
        let mut out = Writer::from_path(path)?;
        out.write_record(["step", "trial", "value", "average"])?;
        Ok(Self { out, finished: false })
    }

    pub fn write_sample(
        &mut self,
        step:    u64,
        trial:   u32,
        value:   f64,
        average: f64,
    ) -> AnalysisResult<()> {
        self.out.write_record(&[
            step.to_string(),
            trial.to_string(),
            value.to_string(),
            average.to_string(),
        ])?;
        Ok(())
    }

    /// Dump a whole series, trial by trial, with the final averages.
    pub fn write_series(&mut self, series: &TimeSeries) -> AnalysisResult<()> {
        for trial in 0..series.trial_count() as u32 {
            for &(step, value) in series.trial(trial) {
                let average = series.average(step).unwrap_or(value);
                self.write_sample(step, trial, value, average)?;
            }
        }
        Ok(())
    }

    /// Flush the file.  Idempotent.
    pub fn finish(&mut self) -> AnalysisResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        Ok(())
    }
}
