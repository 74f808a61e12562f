//! Simulation time model.
//!
//! Time advances in whole `Tick`s (one physics frame plus one controller
//! pass).  Controllers see time as milliseconds, derived from the tick count:
//!
//!   timestamp_ms = tick * tick_duration_ms
//!
//! Deriving timestamps from the tick keeps repeated trials reproducible,
//! unlike reading the wall clock.

use std::fmt;

/// Default frame length: 60 frames per simulated second.
pub const DEFAULT_TICK_MS: f64 = 1000.0 / 60.0;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// Step counter within a trial.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// `true` on every `n`th tick (and always for `n == 0`).
    #[inline]
    pub fn is_multiple_of(self, n: u64) -> bool {
        n == 0 || self.0 % n == 0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current step and maps it to controller-visible milliseconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated milliseconds per tick.
    pub tick_duration_ms: f64,
    /// The current tick, advanced by `SimClock::advance()`.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_duration_ms: f64) -> Self {
        Self {
            tick_duration_ms,
            current_tick: Tick::ZERO,
        }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Rewind to tick 0 (start of a new trial).
    #[inline]
    pub fn reset(&mut self) {
        self.current_tick = Tick::ZERO;
    }

    /// Milliseconds elapsed since tick 0 of this trial.
    #[inline]
    pub fn timestamp_ms(&self) -> f64 {
        self.current_tick.0 as f64 * self.tick_duration_ms
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_MS)
    }
}
