//! One tick's sensor snapshot as seen by a controller.
//!
//! Roles are a closed set, so a reading is two fixed arrays indexed by role
//! rather than a string-keyed map.  A `None` slot means the robot carries no
//! sensor (or probe) in that role under the current preset.

use std::fmt;
use std::str::FromStr;

// ── SensorRole ────────────────────────────────────────────────────────────────

/// Where a discrete counting sensor sits on the robot and what it counts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SensorRole {
    LeftWall,
    RightWall,
    LeftRobot,
    RightRobot,
    GoalZone,
    InnerRedPuck,
    InnerGreenPuck,
    LeftRedPuck,
    RightRedPuck,
    LeftGreenPuck,
    RightGreenPuck,
    Flash,
    Robots,
}

impl SensorRole {
    pub const COUNT: usize = 13;

    pub const ALL: [SensorRole; Self::COUNT] = [
        SensorRole::LeftWall,
        SensorRole::RightWall,
        SensorRole::LeftRobot,
        SensorRole::RightRobot,
        SensorRole::GoalZone,
        SensorRole::InnerRedPuck,
        SensorRole::InnerGreenPuck,
        SensorRole::LeftRedPuck,
        SensorRole::RightRedPuck,
        SensorRole::LeftGreenPuck,
        SensorRole::RightGreenPuck,
        SensorRole::Flash,
        SensorRole::Robots,
    ];

    /// The name scripts use, e.g. `sensorReadings.innerRedPuck.count`.
    pub const fn name(self) -> &'static str {
        match self {
            SensorRole::LeftWall       => "leftWall",
            SensorRole::RightWall      => "rightWall",
            SensorRole::LeftRobot      => "leftRobot",
            SensorRole::RightRobot     => "rightRobot",
            SensorRole::GoalZone       => "goalZone",
            SensorRole::InnerRedPuck   => "innerRedPuck",
            SensorRole::InnerGreenPuck => "innerGreenPuck",
            SensorRole::LeftRedPuck    => "leftRedPuck",
            SensorRole::RightRedPuck   => "rightRedPuck",
            SensorRole::LeftGreenPuck  => "leftGreenPuck",
            SensorRole::RightGreenPuck => "rightGreenPuck",
            SensorRole::Flash          => "flash",
            SensorRole::Robots         => "robots",
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SensorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SensorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SensorRole::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| s.to_string())
    }
}

// ── ProbeRole ─────────────────────────────────────────────────────────────────

/// The three scalar-field probes ahead of the robot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProbeRole {
    LeftProbe,
    CentreProbe,
    RightProbe,
}

impl ProbeRole {
    pub const COUNT: usize = 3;

    pub const ALL: [ProbeRole; Self::COUNT] =
        [ProbeRole::LeftProbe, ProbeRole::CentreProbe, ProbeRole::RightProbe];

    pub const fn name(self) -> &'static str {
        match self {
            ProbeRole::LeftProbe   => "leftProbe",
            ProbeRole::CentreProbe => "centreProbe",
            ProbeRole::RightProbe  => "rightProbe",
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ProbeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProbeRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProbeRole::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Raw field values under one probe's sample point.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ProbeSample {
    pub nest_value:      f32,
    pub pheromone_value: f32,
}

// ── SensorReading ─────────────────────────────────────────────────────────────

/// Immutable per-tick snapshot handed to [`Controller::get_action`][crate::Controller::get_action].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SensorReading {
    counts: [Option<u32>; SensorRole::COUNT],
    probes: [Option<ProbeSample>; ProbeRole::COUNT],
}

impl SensorReading {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count of the sensor in `role`, or `None` if the robot has none there.
    #[inline]
    pub fn count(&self, role: SensorRole) -> Option<u32> {
        self.counts[role.index()]
    }

    /// Count of the sensor in `role`, treating an absent sensor as silent.
    #[inline]
    pub fn count_or_zero(&self, role: SensorRole) -> u32 {
        self.counts[role.index()].unwrap_or(0)
    }

    #[inline]
    pub fn probe(&self, role: ProbeRole) -> Option<ProbeSample> {
        self.probes[role.index()]
    }

    pub fn set_count(&mut self, role: SensorRole, count: u32) {
        self.counts[role.index()] = Some(count);
    }

    pub fn set_probe(&mut self, role: ProbeRole, sample: ProbeSample) {
        self.probes[role.index()] = Some(sample);
    }

    pub fn with_count(mut self, role: SensorRole, count: u32) -> Self {
        self.set_count(role, count);
        self
    }

    /// Shorthand for a probe carrying only a nest value.
    pub fn with_nest(mut self, role: ProbeRole, nest_value: f32) -> Self {
        let pheromone_value = self.probe(role).map_or(0.0, |p| p.pheromone_value);
        self.set_probe(role, ProbeSample { nest_value, pheromone_value });
        self
    }

    pub fn with_probe(mut self, role: ProbeRole, sample: ProbeSample) -> Self {
        self.set_probe(role, sample);
        self
    }

    /// Nest values under the left, centre, and right probes (0.0 if absent).
    pub fn nest_triple(&self) -> (f32, f32, f32) {
        let nest = |r| self.probe(r).map_or(0.0, |p: ProbeSample| p.nest_value);
        (nest(ProbeRole::LeftProbe), nest(ProbeRole::CentreProbe), nest(ProbeRole::RightProbe))
    }

    /// Roles with a sensor present, in role order.
    pub fn roles(&self) -> impl Iterator<Item = SensorRole> + '_ {
        SensorRole::ALL.into_iter().filter(|r| self.counts[r.index()].is_some())
    }
}
