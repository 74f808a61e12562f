//! Controller output.

use swarm_core::SpeedLimits;

/// Text colour shown under a robot when the controller picks none.
pub const DEFAULT_TEXT_COLOUR: &str = "green";

/// One tick's commands for a single robot.
///
/// Built fresh every tick; the world manager applies it whole or, when a
/// controller faults, substitutes [`Action::zero`].
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    /// Forward force along the robot's heading (negative reverses).
    pub linear_speed:   f32,
    /// Torque; positive turns clockwise on screen (y grows downward).
    pub angular_speed:  f32,
    pub gripper_on:     bool,
    pub flash_on:       bool,
    /// Pheromone to deposit at the robot's cell; `0.0` deposits nothing.
    pub emit_pheromone: f32,
    pub text:           String,
    pub text_colour:    String,
}

impl Action {
    /// The neutral action: stand still, gripper open, no signals.
    pub fn zero() -> Self {
        Self {
            linear_speed:   0.0,
            angular_speed:  0.0,
            gripper_on:     false,
            flash_on:       false,
            emit_pheromone: 0.0,
            text:           String::new(),
            text_colour:    DEFAULT_TEXT_COLOUR.to_string(),
        }
    }

    /// Full speed ahead, nothing else.
    pub fn forward(limits: &SpeedLimits) -> Self {
        Self { linear_speed: limits.max_forward, ..Self::zero() }
    }

    pub fn with_angular(mut self, angular_speed: f32) -> Self {
        self.angular_speed = angular_speed;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::zero()
    }
}
