//! Collision-counting sensors.
//!
//! Every sensor is the same masked counter; only its [`SensorFilter`]
//! differs.  The world manager translates each contact into a
//! [`ContactInfo`] and the filter decides whether it counts.

use swarm_control::SensorRole;
use swarm_core::{BodyHandle, KindMask, ObjectKind};

/// What a sensor zone touched.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ContactInfo {
    pub kind:     ObjectKind,
    /// The body is a puck currently held by some robot.
    pub held:     bool,
    /// The body is a robot with its flash on.
    pub flashing: bool,
}

impl ContactInfo {
    #[inline]
    pub fn of(kind: ObjectKind) -> Self {
        Self { kind, held: false, flashing: false }
    }

    #[inline]
    pub fn puck(kind: ObjectKind, held: bool) -> Self {
        Self { kind, held, flashing: false }
    }

    #[inline]
    pub fn robot(flashing: bool) -> Self {
        Self { kind: ObjectKind::Robot, held: false, flashing }
    }
}

/// Which contacts a sensor counts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SensorFilter {
    /// Anything whose kind is in the mask.
    Kinds(KindMask),
    /// Pucks of the masked colours that nobody is holding.
    Pucks(KindMask),
    GoalZone,
    /// Robots that are flashing.
    Flashing,
}

impl SensorFilter {
    pub fn accepts(&self, contact: &ContactInfo) -> bool {
        match *self {
            SensorFilter::Kinds(mask) => mask.contains(contact.kind),
            SensorFilter::Pucks(mask) => mask.contains(contact.kind) && !contact.held,
            SensorFilter::GoalZone => contact.kind == ObjectKind::GoalZone,
            SensorFilter::Flashing => contact.kind == ObjectKind::Robot && contact.flashing,
        }
    }
}

/// A sensor zone attached to a robot.
#[derive(Clone, Debug, PartialEq)]
pub struct Sensor {
    role:   SensorRole,
    body:   BodyHandle,
    filter: SensorFilter,
    count:  u32,
    active: bool,
}

impl Sensor {
    pub fn new(role: SensorRole, body: BodyHandle, filter: SensorFilter) -> Self {
        Self { role, body, filter, count: 0, active: false }
    }

    /// Count the contact if the filter accepts it; returns whether it did.
    pub fn on_contact_begin(&mut self, contact: &ContactInfo) -> bool {
        if !self.filter.accepts(contact) {
            return false;
        }
        self.count += 1;
        self.active = true;
        true
    }

    /// Contact ended.  The count is untouched until the next reset.
    pub fn on_contact_end(&mut self) {
        self.active = false;
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn role(&self) -> SensorRole {
        self.role
    }

    #[inline]
    pub fn body(&self) -> BodyHandle {
        self.body
    }

    #[inline]
    pub fn filter(&self) -> SensorFilter {
        self.filter
    }
}
