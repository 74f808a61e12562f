//! Simulation observer trait for progress reporting and data collection.

use swarm_core::Tick;

use crate::WorldView;

/// Callbacks invoked by [`Sim::tick`][crate::Sim::tick] at key points.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: flash counter
///
/// ```rust,ignore
/// struct Flashes(Vec<usize>);
///
/// impl SimObserver for Flashes {
///     fn on_sample(&mut self, view: &WorldView<'_>) {
///         self.0.push(view.robots.iter().filter(|r| r.flashing).count());
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before physics.
    fn on_tick_start(&mut self, _step: Tick) {}

    /// Called once the tick's robots, fields, and sensors are done.
    fn on_tick_end(&mut self, _step: Tick) {}

    /// Called at sampling points: analysis enabled, `step <= max_step`, and
    /// `step` a multiple of the sample interval.
    fn on_sample(&mut self, _view: &WorldView<'_>) {}

    /// Called after the world was rebuilt for trial `trial`.
    fn on_reset(&mut self, _trial: u32) {}

    /// Called when the user-visible status line changes.
    fn on_status(&mut self, _message: &str) {}

    /// Called once when [`Sim::run`][crate::Sim::run] finishes.
    fn on_sim_end(&mut self, _final_step: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Forward every callback to two observers in turn.
impl<A: SimObserver, B: SimObserver> SimObserver for (A, B) {
    fn on_tick_start(&mut self, step: Tick) {
        self.0.on_tick_start(step);
        self.1.on_tick_start(step);
    }

    fn on_tick_end(&mut self, step: Tick) {
        self.0.on_tick_end(step);
        self.1.on_tick_end(step);
    }

    fn on_sample(&mut self, view: &WorldView<'_>) {
        self.0.on_sample(view);
        self.1.on_sample(view);
    }

    fn on_reset(&mut self, trial: u32) {
        self.0.on_reset(trial);
        self.1.on_reset(trial);
    }

    fn on_status(&mut self, message: &str) {
        self.0.on_status(message);
        self.1.on_status(message);
    }

    fn on_sim_end(&mut self, final_step: Tick) {
        self.0.on_sim_end(final_step);
        self.1.on_sim_end(final_step);
    }
}
