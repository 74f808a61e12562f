//! Gradient-orbit controllers.
//!
//! All three steer along an isoline of the nest-scent field using the left,
//! centre, and right probe values.  Of the six possible orderings only two
//! are singled out:
//!
//! ```text
//!   right ≥ centre ≥ left    on the isoline: hold centre near the threshold
//!   centre ≥ right, left     heading uphill: hard turn left  (-max)
//!   anything else            heading downhill: hard turn right (+max)
//! ```
//!
//! The construction variants additionally nudge pucks across the isoline:
//! an innie turns into pucks on its right (pushing them inward), an outie
//! into pucks on its left (pushing them outward).

use swarm_core::{RobotRng, SpeedLimits};

use crate::avoid::obstacle_left;
use crate::{Action, ControlInput, Controller, SensorReading, SensorRole};

/// Fraction of full turn rate used to hug the isoline.
const ISOLINE_TURN: f32 = 0.3;

/// Pheromone marker dropped while nudging a puck.
const NUDGE_EMIT: f32 = 10.0;

/// Probe ordering relevant to isoline following.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GradientOrder {
    /// `right ≥ centre ≥ left`
    Ascending,
    /// Centre is the maximum.
    CentrePeak,
    Other,
}

impl GradientOrder {
    pub fn classify(left: f32, centre: f32, right: f32) -> Self {
        if right >= centre && centre >= left {
            GradientOrder::Ascending
        } else if centre >= right && centre >= left {
            GradientOrder::CentrePeak
        } else {
            GradientOrder::Other
        }
    }
}

/// Turn rate that keeps the robot on the `threshold` isoline.
fn isoline_turn(centre: f32, threshold: f32, limits: &SpeedLimits) -> f32 {
    if centre < threshold {
        ISOLINE_TURN * limits.max_angular
    } else {
        -ISOLINE_TURN * limits.max_angular
    }
}

/// Shared steering for the orbit family.
///
/// `nudge` is consulted only on the isoline; if it returns a turn rate the
/// robot takes it and drops a pheromone marker.
fn orbit_action(
    reading:   &SensorReading,
    threshold: f32,
    limits:    &SpeedLimits,
    mut action: Action,
    nudge:     impl FnOnce() -> Option<f32>,
) -> Action {
    if obstacle_left(reading) {
        action.angular_speed = limits.max_angular;
        return action;
    }
    let (left, centre, right) = reading.nest_triple();
    action.angular_speed = match GradientOrder::classify(left, centre, right) {
        GradientOrder::Ascending => match nudge() {
            Some(turn) => {
                action.emit_pheromone = NUDGE_EMIT;
                turn
            }
            None => isoline_turn(centre, threshold, limits),
        },
        GradientOrder::CentrePeak => -limits.max_angular,
        GradientOrder::Other => limits.max_angular,
    };
    action
}

// ── OrbitController ───────────────────────────────────────────────────────────

/// Circles the nest on a fixed isoline.
pub struct OrbitController {
    limits:    SpeedLimits,
    threshold: f32,
}

impl OrbitController {
    pub const DEFAULT_THRESHOLD: f32 = 0.75;

    pub fn new(limits: SpeedLimits) -> Self {
        Self { limits, threshold: Self::DEFAULT_THRESHOLD }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl Controller for OrbitController {
    fn get_action(&mut self, input: &ControlInput<'_>, _rng: &mut RobotRng) -> Action {
        orbit_action(
            input.reading,
            self.threshold,
            &self.limits,
            Action::forward(&self.limits),
            || None,
        )
    }

    fn name(&self) -> &'static str {
        "orbit"
    }
}

// ── OrbitalConstructionController ─────────────────────────────────────────────

/// Which way a construction robot pushes pucks across its isoline.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Innie,
    Outie,
}

/// Builds a ring of red pucks around the nest.
///
/// Half the robots become innies (threshold 0.75, flashing so they can be
/// told apart), half outies (0.7).  The role is drawn once at construction.
pub struct OrbitalConstructionController {
    limits:    SpeedLimits,
    side:      Side,
    threshold: f32,
}

impl OrbitalConstructionController {
    pub const INNIE_THRESHOLD: f32 = 0.75;
    pub const OUTIE_THRESHOLD: f32 = 0.7;

    pub fn new(limits: SpeedLimits, rng: &mut RobotRng) -> Self {
        let side = if rng.unit() < 0.5 { Side::Innie } else { Side::Outie };
        Self::with_side(limits, side)
    }

    pub fn with_side(limits: SpeedLimits, side: Side) -> Self {
        let threshold = match side {
            Side::Innie => Self::INNIE_THRESHOLD,
            Side::Outie => Self::OUTIE_THRESHOLD,
        };
        Self { limits, side, threshold }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl Controller for OrbitalConstructionController {
    fn get_action(&mut self, input: &ControlInput<'_>, _rng: &mut RobotRng) -> Action {
        let mut action = Action::forward(&self.limits);
        action.flash_on = self.side == Side::Innie;

        let reading = input.reading;
        let max = self.limits.max_angular;
        let side = self.side;
        orbit_action(reading, self.threshold, &self.limits, action, || match side {
            Side::Innie if reading.count_or_zero(SensorRole::RightRedPuck) > 0 => Some(max),
            Side::Outie if reading.count_or_zero(SensorRole::LeftRedPuck) > 0 => Some(-max),
            _ => None,
        })
    }

    fn name(&self) -> &'static str {
        "orbital-construction"
    }
}

// ── BiColourConstructionController ────────────────────────────────────────────

/// Role in two-colour construction: puck colour, push side, and isoline.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BiColourRole {
    /// Green outie on isoline 0.5.
    GreenOutie,
    /// Green innie on isoline 0.7.
    GreenInnie,
    /// Red outie on isoline 0.8.
    RedOutie,
}

impl BiColourRole {
    /// Draw a role with (roughly) equal odds.
    pub fn draw(rng: &mut RobotRng) -> Self {
        let r = rng.unit();
        if r < 0.333 {
            BiColourRole::GreenOutie
        } else if r < 0.666 {
            BiColourRole::GreenInnie
        } else {
            BiColourRole::RedOutie
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            BiColourRole::GreenOutie => "GO",
            BiColourRole::GreenInnie => "GI",
            BiColourRole::RedOutie   => "RO",
        }
    }

    pub const fn side(self) -> Side {
        match self {
            BiColourRole::GreenInnie => Side::Innie,
            BiColourRole::GreenOutie | BiColourRole::RedOutie => Side::Outie,
        }
    }

    pub const fn threshold(self) -> f32 {
        match self {
            BiColourRole::GreenOutie => 0.5,
            BiColourRole::GreenInnie => 0.7,
            BiColourRole::RedOutie   => 0.8,
        }
    }

    /// Left and right puck sensors for this role's colour.
    const fn puck_sensors(self) -> (SensorRole, SensorRole) {
        match self {
            BiColourRole::RedOutie => (SensorRole::LeftRedPuck, SensorRole::RightRedPuck),
            _ => (SensorRole::LeftGreenPuck, SensorRole::RightGreenPuck),
        }
    }
}

/// Sorts red and green pucks into concentric rings.
pub struct BiColourConstructionController {
    limits: SpeedLimits,
    role:   BiColourRole,
}

impl BiColourConstructionController {
    pub fn new(limits: SpeedLimits, rng: &mut RobotRng) -> Self {
        Self::with_role(limits, BiColourRole::draw(rng))
    }

    pub fn with_role(limits: SpeedLimits, role: BiColourRole) -> Self {
        Self { limits, role }
    }

    pub fn role(&self) -> BiColourRole {
        self.role
    }
}

impl Controller for BiColourConstructionController {
    fn get_action(&mut self, input: &ControlInput<'_>, _rng: &mut RobotRng) -> Action {
        let action = Action::forward(&self.limits).with_text(self.role.label());

        let reading = input.reading;
        let max = self.limits.max_angular;
        let (left_sensor, right_sensor) = self.role.puck_sensors();
        let side = self.role.side();
        orbit_action(reading, self.role.threshold(), &self.limits, action, || match side {
            Side::Innie if reading.count_or_zero(right_sensor) > 0 => Some(max),
            Side::Outie if reading.count_or_zero(left_sensor) > 0 => Some(-max),
            _ => None,
        })
    }

    fn name(&self) -> &'static str {
        "bi-colour-construction"
    }
}
