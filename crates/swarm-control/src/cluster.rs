//! Puck clustering by pick-up and drop.
//!
//! An unladen robot grabs an isolated puck (exactly one ahead, sparse on
//! both sides).  A laden robot drops its puck as soon as another one shows
//! up ahead, then turns in place briefly so it does not grab the same puck
//! again.
//!
//! ```text
//!            inner ≥ 1 while laden
//!   Normal ──────────────────────────▶ BackingUp(since)
//!      ▲                                   │
//!      └──────── elapsed ≥ 250 ms ─────────┘
//! ```

use swarm_core::{RobotRng, SpeedLimits};

use crate::avoid::obstacle_avoidance;
use crate::{Action, ControlInput, Controller, SensorRole};

/// Time spent turning in place after a drop.
pub const BACK_UP_MS: f64 = 250.0;

/// Side counts above this are "dense"; at or below (and non-zero) "sparse".
pub const LOW_DENSITY: u32 = 2;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ClusterState {
    Normal,
    BackingUp { since_ms: f64 },
}

pub struct ClusterController {
    limits: SpeedLimits,
    state:  ClusterState,
}

impl ClusterController {
    pub fn new(limits: SpeedLimits) -> Self {
        Self { limits, state: ClusterState::Normal }
    }

    pub fn state(&self) -> ClusterState {
        self.state
    }

    fn normal(&mut self, input: &ControlInput<'_>, rng: &mut RobotRng) -> Action {
        let laden = input.red_puck_held;
        let max_angular = self.limits.max_angular;

        let avoiding = obstacle_avoidance(input.reading, &self.limits, rng);
        let avoidance = avoiding.is_some();
        let mut action = avoiding.unwrap_or_else(|| Action::forward(&self.limits));
        action.gripper_on = laden;

        let inner = input.reading.count_or_zero(SensorRole::InnerRedPuck);
        let left = input.reading.count_or_zero(SensorRole::LeftRedPuck);
        let right = input.reading.count_or_zero(SensorRole::RightRedPuck);
        let sparse = |n: u32| (1..=LOW_DENSITY).contains(&n);

        if !laden {
            if inner == 1 && left <= 1 && right <= 1 {
                action.gripper_on = true;
            } else if avoidance {
                // keep the evasive turn
            } else if left > right && left > LOW_DENSITY {
                action.angular_speed = max_angular;
            } else if right > left && right > LOW_DENSITY {
                action.angular_speed = -max_angular;
            } else if left > right && sparse(left) {
                action.angular_speed = -max_angular;
            } else if right > left && sparse(right) {
                action.angular_speed = max_angular;
            }
        } else if inner >= 1 {
            action.gripper_on = false;
            self.state = ClusterState::BackingUp { since_ms: input.timestamp_ms };
        }
        action
    }

    fn backing_up(&mut self, since_ms: f64, input: &ControlInput<'_>) -> Action {
        if input.timestamp_ms - since_ms < BACK_UP_MS {
            Action::zero().with_angular(self.limits.max_angular)
        } else {
            self.state = ClusterState::Normal;
            Action::forward(&self.limits)
        }
    }
}

impl Controller for ClusterController {
    fn get_action(&mut self, input: &ControlInput<'_>, rng: &mut RobotRng) -> Action {
        match self.state {
            ClusterState::Normal => self.normal(input, rng),
            ClusterState::BackingUp { since_ms } => self.backing_up(since_ms, input),
        }
    }

    fn name(&self) -> &'static str {
        "cluster"
    }
}
