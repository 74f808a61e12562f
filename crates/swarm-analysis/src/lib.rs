//! `swarm-analysis` — progress measures for the swarm arena simulator.
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`components`] | `connected_component_stats`, `ComponentStats`             |
//! | [`metrics`]    | completion, flashing, holding, second moment, τ; `Metric` |
//! | [`series`]     | `TimeSeries`: step-keyed values across trials             |
//! | [`analyzer`]   | `Analyzer`, a `SimObserver` feeding a `TimeSeries`        |
//! | [`csv`]        | `SeriesCsvWriter`: `step,trial,value,average` rows        |
//! | [`error`]      | `AnalysisError`, `AnalysisResult<T>`                      |
//!
//! # Usage
//!
//! ```rust,ignore
//! use swarm_analysis::{Analyzer, SeriesCsvWriter};
//!
//! let writer = SeriesCsvWriter::new(Path::new("pc.csv"))?;
//! let mut analyzer = Analyzer::for_preset(config.preset).with_writer(writer);
//! sim.run(&mut analyzer)?;
//! if let Some(e) = analyzer.take_error() {
//!     eprintln!("analysis output error: {e}");
//! }
//! ```

pub mod analyzer;
pub mod components;
pub mod csv;
pub mod error;
pub mod metrics;
pub mod series;

#[cfg(test)]
mod tests;

pub use analyzer::{Analyzer, Sample};
pub use components::{ComponentStats, connected_component_stats};
pub use csv::SeriesCsvWriter;
pub use error::{AnalysisError, AnalysisResult};
pub use metrics::{
    Metric, TAU, average_tau_difference, number_flashing, number_holding, percentage_completion,
    percentage_completion_sort, second_moment,
};
pub use series::TimeSeries;
