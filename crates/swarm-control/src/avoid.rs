//! Obstacle avoidance shared by several controllers.
//!
//! An obstacle on a side is any wall or robot counted by that side's
//! proximity sensors this tick.

use swarm_core::{RobotRng, SpeedLimits};

use crate::{Action, ControlInput, Controller, SensorReading, SensorRole};

#[inline]
pub fn obstacle_left(reading: &SensorReading) -> bool {
    reading.count_or_zero(SensorRole::LeftWall) > 0 || reading.count_or_zero(SensorRole::LeftRobot) > 0
}

#[inline]
pub fn obstacle_right(reading: &SensorReading) -> bool {
    reading.count_or_zero(SensorRole::RightWall) > 0
        || reading.count_or_zero(SensorRole::RightRobot) > 0
}

/// The evasive action for this reading, or `None` when both sides are clear.
///
/// ```text
///   both sides   reverse, random turn in [-max, max)
///   left only    forward, turn right (+max)
///   right only   forward, turn left  (-max)
/// ```
pub fn obstacle_avoidance(
    reading: &SensorReading,
    limits:  &SpeedLimits,
    rng:     &mut RobotRng,
) -> Option<Action> {
    match (obstacle_left(reading), obstacle_right(reading)) {
        (true, true) => {
            let turn = 2.0 * (0.5 - rng.unit()) * limits.max_angular;
            Some(Action { linear_speed: -limits.max_forward, angular_speed: turn, ..Action::zero() })
        }
        (true, false) => Some(Action::forward(limits).with_angular(limits.max_angular)),
        (false, true) => Some(Action::forward(limits).with_angular(-limits.max_angular)),
        (false, false) => None,
    }
}

/// Wander forward, turning away from walls and robots.
pub struct SimpleAvoidController {
    limits: SpeedLimits,
}

impl SimpleAvoidController {
    pub fn new(limits: SpeedLimits) -> Self {
        Self { limits }
    }
}

impl Controller for SimpleAvoidController {
    fn get_action(&mut self, input: &ControlInput<'_>, rng: &mut RobotRng) -> Action {
        obstacle_avoidance(input.reading, &self.limits, rng)
            .unwrap_or_else(|| Action::forward(&self.limits))
    }

    fn name(&self) -> &'static str {
        "simple-avoid"
    }
}
