//! Body descriptions and contact events.

use swarm_core::{BodyHandle, Pose};

use crate::Shape;

/// Density used to derive mass from area when none is given.
pub const DEFAULT_DENSITY: f32 = 0.001;

/// How a body is anchored in the world.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Placement {
    /// Moves under forces, torques, constraints, and collisions.
    Dynamic(Pose),
    /// Never moves.
    Static(Pose),
    /// Rigidly carried by a dynamic or static root body at a local offset.
    Attached { parent: BodyHandle, offset: Pose },
}

/// Everything needed to add a body to a [`PhysicsWorld`][crate::PhysicsWorld].
#[derive(Clone, Debug, PartialEq)]
pub struct BodyDesc {
    pub shape:        Shape,
    pub placement:    Placement,
    /// Sensor zones report contacts but never push other bodies.
    pub zone:         bool,
    /// `None` derives mass from area × [`DEFAULT_DENSITY`].
    pub mass:         Option<f32>,
    /// Per-step velocity damping in `[0, 1]`; 1.0 removes all momentum.
    pub friction_air: f32,
}

impl BodyDesc {
    pub fn dynamic(shape: Shape, pose: Pose) -> Self {
        Self::new(shape, Placement::Dynamic(pose))
    }

    pub fn fixed(shape: Shape, pose: Pose) -> Self {
        Self::new(shape, Placement::Static(pose))
    }

    pub fn attached(parent: BodyHandle, shape: Shape, offset: Pose) -> Self {
        Self::new(shape, Placement::Attached { parent, offset })
    }

    fn new(shape: Shape, placement: Placement) -> Self {
        Self {
            shape,
            placement,
            zone:         false,
            mass:         None,
            friction_air: 1.0,
        }
    }

    /// Turn this body into a sensor zone.
    pub fn zone(mut self) -> Self {
        self.zone = true;
        self
    }

    pub fn mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn friction_air(mut self, friction_air: f32) -> Self {
        self.friction_air = friction_air;
        self
    }
}

// ── Contacts ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContactPhase {
    /// Reported on every step while the pair overlaps.
    Begin,
    /// Reported once, on the first step the pair no longer overlaps.
    End,
}

/// A sensor zone touched (or stopped touching) another body.
///
/// `zone` is always a zone body.  When two zones overlap, one event is
/// emitted from each side.  Zones never report bodies sharing their root.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactEvent {
    pub zone:  BodyHandle,
    pub other: BodyHandle,
    pub phase: ContactPhase,
}
