//! The `Controller` trait: one decision per robot per tick.

use std::fmt;

use swarm_core::RobotRng;

use crate::{Action, ScriptFault, SensorReading};

/// Everything a controller may look at when deciding.
#[derive(Copy, Clone, Debug)]
pub struct ControlInput<'a> {
    /// Simulated time in milliseconds since the trial started.
    pub timestamp_ms:    f64,
    pub reading:         &'a SensorReading,
    pub red_puck_held:   bool,
    pub green_puck_held: bool,
}

impl<'a> ControlInput<'a> {
    #[inline]
    pub fn new(timestamp_ms: f64, reading: &'a SensorReading) -> Self {
        Self { timestamp_ms, reading, red_puck_held: false, green_puck_held: false }
    }

    #[inline]
    pub fn puck_held(&self) -> bool {
        self.red_puck_held || self.green_puck_held
    }
}

/// Health of a controller after its most recent decision.
#[derive(Clone, Debug, PartialEq)]
pub enum ControllerStatus {
    /// Nothing to run yet (an empty program).
    Ready,
    Good,
    Fault(ScriptFault),
}

impl ControllerStatus {
    #[inline]
    pub fn is_fault(&self) -> bool {
        matches!(self, ControllerStatus::Fault(_))
    }
}

impl fmt::Display for ControllerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerStatus::Ready => f.write_str("Status: Ready. Please design your controller"),
            ControllerStatus::Good => f.write_str("Status: Good"),
            ControllerStatus::Fault(fault) => write!(f, "Status: Problem with controller! {fault}"),
        }
    }
}

/// Pluggable robot decision unit.
///
/// Implementations own whatever history they need (state machines, role
/// choices, persistent variables) and must not reach outside the
/// [`ControlInput`].  Speed limits are fixed when the controller is built.
/// Actions returned should stay within those limits; the world manager
/// clamps anything that does not.
pub trait Controller: Send + 'static {
    fn get_action(&mut self, input: &ControlInput<'_>, rng: &mut RobotRng) -> Action;

    /// Status after the last `get_action` call.
    fn status(&self) -> ControllerStatus {
        ControllerStatus::Good
    }

    fn name(&self) -> &'static str;
}

/// Never moves.
pub struct IdleController;

impl Controller for IdleController {
    fn get_action(&mut self, _input: &ControlInput<'_>, _rng: &mut RobotRng) -> Action {
        Action::zero()
    }

    fn name(&self) -> &'static str {
        "idle"
    }
}
