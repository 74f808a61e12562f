//! Deterministic per-robot and simulation-level RNG wrappers.
//!
//! Each robot gets its own `SmallRng` seeded by:
//!
//!   seed = trial_seed XOR (robot_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio.
//! Robots never share RNG state, so adding a robot at the end of the list
//! does not disturb the random streams of robots already present.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::RobotId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── RobotRng ──────────────────────────────────────────────────────────────────

/// Per-robot deterministic RNG, handed to the robot's controller each tick.
pub struct RobotRng(SmallRng);

impl RobotRng {
    pub fn new(trial_seed: u64, robot: RobotId) -> Self {
        let seed = trial_seed ^ (robot.0 as u64).wrapping_mul(MIXING_CONSTANT);
        RobotRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform `f32` in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.0.r#gen()
    }

    /// A value from the `Standard` distribution; scripts draw `f64`s here.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for world construction: spawn poses, puck placement,
/// growth-point jitter.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform `f32` in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.0.r#gen()
    }
}
